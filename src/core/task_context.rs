use super::task::{TaskId, TaskOutput};

/// Upstream material handed to an agent alongside its task description
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    /// Outputs of the task's declared dependencies, in declaration order
    pub dependencies: Vec<(TaskId, String)>,
    /// Crew memory accumulated from every earlier task, when enabled
    pub memory: Option<String>,
}

impl TaskContext {
    /// Creates a new empty TaskContext
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency output to the context
    pub fn push_output(&mut self, output: &TaskOutput) {
        self.dependencies
            .push((output.task_id.clone(), output.raw_text.clone()));
    }

    /// Combines all context sources into a single formatted string
    ///
    /// Dependency outputs come first with one header per task, followed by the
    /// crew memory when present. Returns an empty string if there is nothing.
    pub fn combined_context(&self) -> String {
        let memory = self
            .memory
            .as_deref()
            .filter(|m| !m.trim().is_empty());

        if self.dependencies.is_empty() && memory.is_none() {
            return String::new();
        }

        let mut combined = String::with_capacity(
            self.dependencies
                .iter()
                .map(|(id, text)| id.as_str().len() + text.len() + 32)
                .sum::<usize>()
                + memory.map(str::len).unwrap_or(0),
        );

        if !self.dependencies.is_empty() {
            combined.push_str("Results from previous tasks:\n");
            for (task_id, text) in &self.dependencies {
                combined.push_str("Output of task '");
                combined.push_str(task_id.as_str());
                combined.push_str("':\n");
                combined.push_str(text);
                combined.push_str("\n\n");
            }
        }

        if let Some(memory) = memory {
            combined.push_str("Crew memory:\n");
            combined.push_str(memory);
            combined.push_str("\n\n");
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn output(id: &str, text: &str) -> TaskOutput {
        TaskOutput {
            task_id: TaskId::new(id),
            raw_text: text.to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_context_renders_nothing() {
        let mut ctx = TaskContext::new();
        ctx.memory = Some("   ".to_string());
        assert!(ctx.combined_context().is_empty());
    }

    #[test]
    fn dependency_outputs_keep_their_order() {
        let mut ctx = TaskContext::new();
        ctx.push_output(&output("intake", "requirements"));
        ctx.push_output(&output("mapping", "dependency map"));
        ctx.memory = Some("intake said hello".to_string());

        let combined = ctx.combined_context();
        let intake = combined.find("Output of task 'intake'").unwrap();
        let mapping = combined.find("Output of task 'mapping'").unwrap();
        assert!(intake < mapping);
        assert!(combined.contains("Crew memory:\nintake said hello"));
    }
}
