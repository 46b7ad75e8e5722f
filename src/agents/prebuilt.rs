//! Ready-made crews, looked up by name

use super::{Agent, Crew};
use crate::error::{Error, Result};

const PREBUILT_CREWS: &[(&str, fn() -> Crew)] = &[
    ("research", research_crew),
    ("coding", coding_crew),
    ("support", support_crew),
];

pub fn prebuilt_crew(name: &str) -> Result<Crew> {
    PREBUILT_CREWS
        .iter()
        .find(|(crew_name, _)| *crew_name == name)
        .map(|(_, build)| build())
        .ok_or_else(|| Error::UnknownCrew(name.to_string()))
}

pub fn prebuilt_crew_names() -> Vec<&'static str> {
    PREBUILT_CREWS.iter().map(|(name, _)| *name).collect()
}

fn research_crew() -> Crew {
    Crew::new(vec![
        Agent::new(
            "Researcher",
            "Gather up-to-date information from the web",
            "Expert at finding and summarizing information",
        ),
        Agent::new(
            "Writer",
            "Produce clear summaries of research",
            "Turns raw data into digestible reports",
        ),
    ])
}

fn coding_crew() -> Crew {
    Crew::new(vec![
        Agent::new(
            "Planner",
            "Design software solutions",
            "Breaks problems into modular tasks",
        ),
        Agent::new(
            "Coder",
            "Implement software tasks",
            "Writes clean and efficient code",
        )
        .with_code_execution(),
    ])
}

fn support_crew() -> Crew {
    Crew::new(vec![
        Agent::new(
            "Helper",
            "Answer user questions",
            "Friendly assistant ready to help",
        ),
        Agent::new(
            "Triage",
            "Route complex issues to specialists",
            "Understands when to escalate problems",
        ),
    ])
}
