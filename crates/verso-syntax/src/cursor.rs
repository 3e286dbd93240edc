use crate::SyntaxNode;

pub struct Preorder<'a> {
    start: SyntaxNode<'a>,
    next: Option<WalkEvent<'a>>,
    skip_subtree: bool,
}

impl<'a> Preorder<'a> {
    pub fn new(start: SyntaxNode<'a>) -> Self {
        Self { start, next: Some(WalkEvent::Enter(start)), skip_subtree: false }
    }

    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }

    /// Only the `Enter` events.
    pub fn nodes(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_subtree {
            self.next = self.next.take().and_then(|next| match next {
                WalkEvent::Enter(first_child) => first_child.parent().map(WalkEvent::Leave),
                WalkEvent::Leave(parent) => Some(WalkEvent::Leave(parent)),
            });
            self.skip_subtree = false;
        }

        let next = self.next.take();

        self.next = next.as_ref().and_then(|event| {
            Some(match event {
                WalkEvent::Enter(node) => match node.first_child() {
                    Some(child) => WalkEvent::Enter(child),
                    None => WalkEvent::Leave(*node),
                },
                WalkEvent::Leave(node) => {
                    if node == &self.start {
                        return None;
                    }

                    match node.next_sibling() {
                        Some(sibling) => WalkEvent::Enter(sibling),
                        None => WalkEvent::Leave(node.parent()?),
                    }
                }
            })
        });

        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}
