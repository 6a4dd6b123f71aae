use glam::Vec3;
use std::fmt;

/// Errors surfaced by grammar interpretation and geometry placement.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureError {
    /// A `]` was interpreted while the branch stack was empty.
    ///
    /// `index` is the byte offset of the offending symbol in the expanded
    /// grammar string.
    UnbalancedBracket { index: usize },

    /// A template identifier was requested that the source does not provide.
    TemplateNotFound { name: String },

    /// A placement call was made against an aggregator before any template
    /// was bound to it.
    NoTemplateBound,

    /// `Turtle::rotate` was called with an axis that is not exactly one of
    /// the three unit axes.
    InvalidAxis { axis: Vec3 },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedBracket { index } => {
                write!(f, "unmatched ']' at offset {index}: pop on empty branch stack")
            }
            Self::TemplateNotFound { name } => {
                write!(f, "no template registered under name '{name}'")
            }
            Self::NoTemplateBound => {
                write!(f, "placement attempted before a template was bound")
            }
            Self::InvalidAxis { axis } => {
                write!(f, "rotation axis {axis} is not a unit coordinate axis")
            }
        }
    }
}

impl std::error::Error for StructureError {}
