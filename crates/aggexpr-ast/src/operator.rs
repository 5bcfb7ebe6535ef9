//! Operators with precedence information

use serde::{Deserialize, Serialize};

/// Binary operators with their precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Precedence 1 (lowest)
    /// Logical or (`||`)
    Or,

    // Precedence 2
    /// Logical and (`&&`)
    And,

    // Precedence 4 (3 is unary `!`)
    Equal,
    NotEqual,

    // Precedence 5
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,

    // Precedence 6
    Add,
    Subtract,

    // Precedence 7
    Multiply,
    Divide,
    /// Floating point remainder
    Modulo,

    // Precedence 9 (8 is unary `+`/`-`), right-associative
    Power,
}

impl BinaryOp {
    /// Get the precedence level (1-9, higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equal | Self::NotEqual => 4,
            Self::Less | Self::LessOrEqual | Self::Greater | Self::GreaterOrEqual => 5,
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide | Self::Modulo => 7,
            Self::Power => 9,
        }
    }

    pub const fn is_right_associative(&self) -> bool {
        matches!(self, Self::Power)
    }

    /// `<`, `<=`, `>`, `>=`
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessOrEqual | Self::Greater | Self::GreaterOrEqual
        )
    }

    /// `==`, `!=`
    pub const fn is_equality(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Subtract
                | Self::Multiply
                | Self::Divide
                | Self::Modulo
                | Self::Power
        )
    }

    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "^",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical not (`!`)
    Not,
    /// Arithmetic negation (`-`)
    Negate,
    /// Unary plus (`+`)
    Plus,
}

impl UnaryOp {
    /// Get the precedence level, on the same scale as [`BinaryOp::precedence`]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Not => 3,
            Self::Negate | Self::Plus => 8,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
            Self::Plus => "+",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ladder() {
        assert!(BinaryOp::Power.precedence() > UnaryOp::Negate.precedence());
        assert!(UnaryOp::Negate.precedence() > BinaryOp::Multiply.precedence());
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Less.precedence());
        assert!(BinaryOp::Less.precedence() > BinaryOp::Equal.precedence());
        assert!(BinaryOp::Equal.precedence() > UnaryOp::Not.precedence());
        assert!(UnaryOp::Not.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_only_power_is_right_associative() {
        assert!(BinaryOp::Power.is_right_associative());
        assert!(!BinaryOp::Subtract.is_right_associative());
        assert!(!BinaryOp::Modulo.is_right_associative());
    }
}
