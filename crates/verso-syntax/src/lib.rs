//! Mutable, span-indexed syntax tree with in-place patching.
//!
//! Nodes live in a generational arena and refer to a contiguous range of the
//! token array the tree owns. Patching after an edit replaces the smallest
//! matching subtree and keeps every other node id valid.

mod arena;
mod builder;
mod cursor;
mod node_kind;
mod patch;
mod syntax_kind;
mod token;
mod token_set;
mod tree;

/// Stable handle of a node inside a `SyntaxTree`.
pub use arena::NodeId;
/// Incremental builder used by the analysers.
pub use builder::TreeBuilder;
pub use cursor::{Preorder, WalkEvent};
/// Node kinds together with their token slots.
pub use node_kind::NodeKind;
pub use patch::PatchOutcome;
/// Token kinds produced by the tokenizers.
pub use syntax_kind::SyntaxKind;
pub use token::Token;
/// Compact set for grouping `SyntaxKind` values.
pub use token_set::TokenSet;
pub use tree::{SyntaxNode, SyntaxTree};
