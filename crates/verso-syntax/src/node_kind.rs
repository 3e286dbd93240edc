/// Kind of a syntax node. Slot fields hold token offsets relative to the
/// node's first token and are `None` until the parser has seen that token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    Document,
    Element,
    StartTag { name: Option<u32>, close: Option<u32>, self_closing: bool },
    EndTag { name: Option<u32>, close: Option<u32> },
    Attribute { equals: Option<u32>, value_close: Option<u32> },
    Text,
    Comment { close: Option<u32> },
    CData { close: Option<u32> },
    ProcessingInstruction { close: Option<u32> },
    DocType,

    Stylesheet,
    Rule,
    Selector,
    DeclarationBlock { close: Option<u32> },
    Declaration { colon: Option<u32>, value: Option<u32>, semicolon: Option<u32> },
    AtRule { terminator: Option<u32> },
    RuleBlock { close: Option<u32> },

    Error,
    /// Placeholder for a node that has been started but not finished.
    Tombstone,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Element => "Element",
            Self::StartTag { .. } => "StartTag",
            Self::EndTag { .. } => "EndTag",
            Self::Attribute { .. } => "Attribute",
            Self::Text => "Text",
            Self::Comment { .. } => "Comment",
            Self::CData { .. } => "CData",
            Self::ProcessingInstruction { .. } => "ProcessingInstruction",
            Self::DocType => "DocType",
            Self::Stylesheet => "Stylesheet",
            Self::Rule => "Rule",
            Self::Selector => "Selector",
            Self::DeclarationBlock { .. } => "DeclarationBlock",
            Self::Declaration { .. } => "Declaration",
            Self::AtRule { .. } => "AtRule",
            Self::RuleBlock { .. } => "RuleBlock",
            Self::Error => "Error",
            Self::Tombstone => "Tombstone",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Document | Self::Stylesheet)
    }

    /// Same variant, regardless of slot contents.
    pub fn is_similar(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Whether every mandatory slot has been seen.
    pub fn slots_filled(&self) -> bool {
        match *self {
            Self::StartTag { name, close, .. } | Self::EndTag { name, close } => {
                name.is_some() && close.is_some()
            }
            // `<input disabled>` carries no value at all.
            Self::Attribute { equals, value_close } => equals.is_none() || value_close.is_some(),
            Self::Comment { close }
            | Self::CData { close }
            | Self::ProcessingInstruction { close }
            | Self::DeclarationBlock { close }
            | Self::RuleBlock { close } => close.is_some(),
            Self::Declaration { colon, value, .. } => colon.is_some() && value.is_some(),
            Self::AtRule { terminator } => terminator.is_some(),
            Self::Error | Self::Tombstone => false,
            Self::Document
            | Self::Element
            | Self::Text
            | Self::DocType
            | Self::Stylesheet
            | Self::Rule
            | Self::Selector => true,
        }
    }

    /// Moves every slot at or after `offset` by `diff` tokens.
    pub fn shift_slots_from(&mut self, offset: u32, diff: i64) {
        let shift = |slot: &mut Option<u32>| {
            if let Some(value) = slot
                && *value >= offset
            {
                *value = (i64::from(*value) + diff) as u32;
            }
        };

        match self {
            Self::StartTag { name, close, .. } | Self::EndTag { name, close } => {
                shift(name);
                shift(close);
            }
            Self::Attribute { equals, value_close } => {
                shift(equals);
                shift(value_close);
            }
            Self::Comment { close }
            | Self::CData { close }
            | Self::ProcessingInstruction { close }
            | Self::DeclarationBlock { close }
            | Self::RuleBlock { close } => shift(close),
            Self::Declaration { colon, value, semicolon } => {
                shift(colon);
                shift(value);
                shift(semicolon);
            }
            Self::AtRule { terminator } => shift(terminator),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_ignores_slots() {
        let a = NodeKind::Attribute { equals: Some(1), value_close: Some(4) };
        let b = NodeKind::Attribute { equals: None, value_close: None };
        assert!(a.is_similar(&b));
        assert!(!a.is_similar(&NodeKind::Text));
    }

    #[test]
    fn slots() {
        assert!(NodeKind::Attribute { equals: None, value_close: None }.slots_filled());
        assert!(!NodeKind::Attribute { equals: Some(1), value_close: None }.slots_filled());
        assert!(!NodeKind::StartTag { name: Some(1), close: None, self_closing: false }.slots_filled());
        assert!(NodeKind::Declaration { colon: Some(1), value: Some(3), semicolon: None }.slots_filled());
        assert!(!NodeKind::Error.slots_filled());
    }

    #[test]
    fn shifts_slots_from_offset() {
        let mut kind = NodeKind::Declaration { colon: Some(1), value: Some(3), semicolon: Some(5) };
        kind.shift_slots_from(3, 2);
        assert_eq!(kind, NodeKind::Declaration { colon: Some(1), value: Some(5), semicolon: Some(7) });

        kind.shift_slots_from(2, -1);
        assert_eq!(kind, NodeKind::Declaration { colon: Some(1), value: Some(4), semicolon: Some(6) });

        let mut at_rule = NodeKind::AtRule { terminator: Some(9) };
        at_rule.shift_slots_from(9, 1);
        assert_eq!(at_rule, NodeKind::AtRule { terminator: Some(10) });
    }
}
