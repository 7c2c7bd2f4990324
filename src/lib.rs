//! A library for reading I.G.I-2: Covert Strike model files.
//!
//! Model geometry ships in `.mef` files: an ILFF chunk container wrapping a
//! set of fixed-layout record arrays. [`format::ilff`] indexes the container
//! and [`format::mef`] decodes the records into owned, typed arrays.
//!
//! ```rust no_run
//! # fn main() -> Result<(), meflib::FormatError> {
//! use meflib::format::mef::MefModel;
//!
//! match MefModel::from_file("631_01_1.mef")? {
//!     MefModel::Render(model) => println!("{} vertices", model.vertices.len()),
//!     MefModel::Shadow(model) => println!("{} shadow faces", model.faces.len()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every decode call is a pure function over chunk bytes: a malformed file
//! fails with a [`FormatError`] rather than producing partial geometry, and
//! decoded values borrow nothing from the source buffer. Writing is not
//! supported; the game's files are treated as read-only input.

pub mod error;
pub mod format;
pub mod util;

pub use error::FormatError;
