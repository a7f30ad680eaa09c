//! Template normalization for countess.
//!
//! Web component sources wrap their markup in a `<dom-module>` element, keep
//! the rendered content inside `<template>`, style the component itself with
//! `:host` selectors and carry mixins, scripts and comments that an HTML
//! parser either chokes on or would mistake for content. This crate rewrites
//! such a source into an ordinary page:
//!
//! 1. `dom-module` becomes `html`.
//! 2. The first `<template` becomes `<body`, the last `</template` becomes `</body`.
//! 3. Lines containing `@apply` are dropped.
//! 4. The text is split into whitespace-separated words; `:host` selectors
//!    are rewritten to target `html`, and custom property mixins (`--name: {...}`
//!    or `--name: value;`), `<script>` elements and `<!-- -->` comments are
//!    removed.
//! 5. The surviving words are joined with single spaces.
//!
//! Plain HTML pages pass through with only their whitespace collapsed.
//!
//! # Example
//!
//! ```
//! use countess_template::normalize_template;
//!
//! let page = normalize_template("<dom-module><template><style>:host(.x) { }</style></template></dom-module>")
//!     .unwrap();
//! assert_eq!(page, "<html><body><style>html.x { }</style></body></html>");
//! ```

mod error;
mod normalize;

pub use error::{Construct, TemplateError};
pub use normalize::{normalize_template, rewrite_host};

/// Tag name of the element wrapping a component definition.
pub const WRAPPER_TAG: &str = "dom-module";

/// Tag name the wrapper and `:host` selectors are rewritten to.
pub const ROOT_TAG: &str = "html";

/// Marker of a line applying a mixin.
pub const APPLY_MARKER: &str = "@apply";
