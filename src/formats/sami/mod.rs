/*!
 * SAMI (Synchronized Accessible Media Interchange) support.
 *
 * A SAMI file is HTML-like markup: a `<style>` block of CSS class rules that
 * declare languages, and a body of `<Sync Start=ms>` elements holding one
 * `<P Class=...>` per language.
 */

pub mod reader;
pub mod writer;

pub use reader::SamiReader;
pub use writer::SamiWriter;
