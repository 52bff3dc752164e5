/*!
 * Format-independent caption document model.
 *
 * Every reader produces these types and every writer consumes them:
 * - `model`: documents, tracks, captions and the caption node tree
 * - `style`: style attributes and the per-class style registry
 * - `timing`: microsecond clock arithmetic and timestamp rendering
 * - `text`: entity decoding and plain-text flattening
 */

pub mod model;
pub mod style;
pub mod text;
pub mod timing;

pub use model::{Caption, CaptionNode, Document, Track};
pub use style::{Alignment, StyleAttributes, StyleRegistry, StyleRule};
