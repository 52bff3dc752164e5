/*!
 * Building blocks for readers of HTML-like caption markup.
 *
 * - `scanner`: lenient finite-state tokenizer
 * - `inline`: open-tag stack that turns inline tags into a balanced node tree
 * - `css`: class rules and inline style declarations
 */

pub mod css;
pub mod inline;
pub mod scanner;

pub use inline::{InlineBuilder, InlineKind};
pub use scanner::{Scanner, Token};
