//! `hbs_import_core` rewrites template import directives into nested scope
//! blocks that the Handlebars/Glimmer template engine understands natively.
//!
//! ```handlebars
//! {{import FooBar from "./foo-bar"}}
//! <FooBar />
//! ```
//!
//! becomes, for the template `app/pods/index/template.hbs` with the
//! components root `app/pods`:
//!
//! ```handlebars
//! {{#let (component 'index/foo-bar') as |FooBar|}}
//! <FooBar />
//! {{/let}}
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template file
//!   → Extraction (find and cut every `{{import X from "..."}}` directive)
//!   → Resolution (rewrite `./` and `../` paths relative to the components root)
//!   → Validation (local names must be CamelCased letters and digits)
//!   → Reassembly (N `{{#let}}` openers + body + N `{{/let}}` closers)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Loading `hbs-import.toml` and deriving the components root.
//! - [`project`] — Discovering templates below a project root and running a
//!   [`FileTransformer`] over them.
//!
//! ## Quick Start
//!
//! ```rust
//! use hbs_import_core::FileTransformer;
//! use hbs_import_core::ImportTransformer;
//! use hbs_import_core::TransformerConfig;
//!
//! let transformer = ImportTransformer::new(TransformerConfig::new("a")).unwrap();
//! let output = transformer
//! 	.transform("{{import Foo from \"./foo\"}}Hello", "a/b/template.hbs")
//! 	.unwrap();
//!
//! assert_eq!(output, "{{#let (component 'b/foo') as |Foo|}}Hello{{/let}}");
//! ```

pub use declaration::*;
pub use error::*;
pub use logger::*;
pub use resolve::*;
pub use transformer::*;

pub mod config;
mod declaration;
#[allow(unused_assignments)]
mod error;
mod logger;
pub mod project;
mod resolve;
mod transformer;
