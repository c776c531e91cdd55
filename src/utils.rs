//! Some utility functions

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::schedule::ScheduleEntry;
use crate::task::Task;
use crate::controller::{Message, Severity};

/// Deserialize a key that may be stored either as a string or as a number
pub(crate) fn string_or_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(T::from(s)),
        Value::Number(n) => Ok(T::from(n.to_string())),
        other => Err(serde::de::Error::custom(format!("Expected a string or a number, got {}", other))),
    }
}

/// A debug utility that pretty-prints a weekly schedule
pub fn print_schedule_list(entries: &[ScheduleEntry]) {
    if entries.is_empty() {
        println!("    (no schedule entry)");
    }
    for entry in entries {
        print_schedule_entry(entry);
    }
}

pub fn print_schedule_entry(entry: &ScheduleEntry) {
    println!("    {:<10} {}  {}\t{} / {}\t{}",
        entry.day().name(),
        entry.time(),
        entry.subject(),
        entry.room().unwrap_or("-"),
        entry.instructor().unwrap_or("-"),
        entry.id(),
    );
}

/// A debug utility that pretty-prints tasks
pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("    (no task)");
    }
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    println!("    {} {}\t{}\t{:<6}\t{}", completion, task.due_date(), task.title(), task.priority().label(), task.id());
}

pub fn print_message(message: Option<&Message>) {
    if let Some(message) = message {
        let marker = match message.severity {
            Severity::Success => "OK",
            Severity::Error => "!!",
        };
        println!("  [{}] {}", marker, message.text);
    }
}
