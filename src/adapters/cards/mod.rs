//! Card Renderer Adapters.
//!
//! - `AdaptiveCardRenderer` - Adaptive card JSON templates with `{{name}}`
//!   placeholders, loaded from a directory or embedded

mod adaptive_card_renderer;

pub use adaptive_card_renderer::AdaptiveCardRenderer;
