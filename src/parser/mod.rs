//! Clipboard text parsing.
//!
//! Turns arbitrary text into a canonical [`Link`] when it contains one of the
//! recognized video link shapes:
//!
//! - watch page: `youtube.com/watch?v=ID`
//! - short link: `youtu.be/ID`
//! - shorts: `youtube.com/shorts/ID`
//! - playlist: `youtube.com/playlist?list=ID`
//!
//! # Example
//!
//! ```
//! use tubewatch_core::parser::match_link;
//!
//! let link = match_link("www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
//! assert_eq!(link.as_str(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
//! ```

mod link;

pub use link::{Link, match_link};
