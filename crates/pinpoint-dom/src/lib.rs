pub mod document;
pub mod error;
pub mod html;
pub mod node;

pub use document::{Document, ElementData, NodeId, NodeKind, NodeRef};
pub use error::DomError;
pub use html::HtmlSnapshot;
pub use node::DomNode;
