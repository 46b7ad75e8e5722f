//! Agent and crew records
//!
//! The messaging core never inspects these; they are carried through
//! construction and lookup only.

use serde::{Deserialize, Serialize};

pub mod lookup;
pub mod prebuilt;

pub use lookup::AgentLookup;
pub use prebuilt::{prebuilt_crew, prebuilt_crew_names};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub allow_code_execution: bool,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            allow_code_execution: false,
        }
    }

    pub fn with_code_execution(mut self) -> Self {
        self.allow_code_execution = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub agents: Vec<Agent>,
}

impl Crew {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn roles(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.role.as_str()).collect()
    }
}
