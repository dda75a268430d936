//! Some utility functions

use crate::task::Task;

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.done() { "✓" } else { " " };
    println!("    {} {}\t{} ({})", completion, task.title(), task.date(), task.id());
}

/// A debug utility that pretty-prints a day's task list
pub fn print_task_list(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("    (no task on this day)");
        return;
    }
    for task in tasks {
        print_task(task);
    }
}
