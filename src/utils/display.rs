use crate::agents::Agent;
use crate::messaging::LogRecord;
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_record(record: &LogRecord) {
    println!(
        "{} {} {}",
        format!("#{}", record.id).dimmed(),
        format!("[{}]", record.queue).yellow(),
        record.message
    );
}

pub fn print_agent(agent: &Agent) {
    let role = if agent.allow_code_execution {
        format!("{} (code execution)", agent.role)
    } else {
        agent.role.clone()
    };
    println!("  {}", role.bright_green().bold());
    println!("    goal: {}", agent.goal);
    println!("    backstory: {}", agent.backstory);
}
