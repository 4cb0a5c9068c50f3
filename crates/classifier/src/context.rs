use serde::{Deserialize, Serialize};
use tracing::debug;

/// The functional area an execution queue serves.
///
/// Classification rules differ per context; an identifier string that does
/// not name a known context falls back to [`ViewContext::Generic`] and its
/// small default list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewContext {
    /// The patient task worklist
    TaskWorklist,

    /// Medical-data entry forms
    MedicalData,

    /// Billing transaction views
    Billing,

    /// Fallback for unrecognized contexts
    Generic,
}

impl ViewContext {
    /// Stable identifier, used in logs, metric labels, and config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewContext::TaskWorklist => "task-worklist",
            ViewContext::MedicalData => "medical-data",
            ViewContext::Billing => "billing",
            ViewContext::Generic => "generic",
        }
    }

    /// All contexts a coordinator owns a queue for
    pub const ALL: [ViewContext; 4] = [
        ViewContext::TaskWorklist,
        ViewContext::MedicalData,
        ViewContext::Billing,
        ViewContext::Generic,
    ];

    /// Resolve a context identifier string, falling back to `Generic` for
    /// anything unrecognized.
    pub fn parse(identifier: &str) -> Self {
        match identifier {
            "task-worklist" => ViewContext::TaskWorklist,
            "medical-data" => ViewContext::MedicalData,
            "billing" => ViewContext::Billing,
            other => {
                debug!(context = other, "unknown view context, using generic rules");
                ViewContext::Generic
            }
        }
    }
}

impl std::fmt::Display for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
