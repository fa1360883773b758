use super::task::TaskOutput;
use crate::constants::MAX_MEMORY_CHARS;

/// Conversation context shared by every task of a run when crew memory is on.
///
/// Unlike dependency wiring, memory is best effort: it is trimmed from the
/// oldest entry once it grows past its budget.
#[derive(Debug, Clone, Default)]
pub struct CrewMemory {
    entries: Vec<MemoryEntry>,
    budget: usize,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    agent_role: String,
    task_id: String,
    text: String,
}

impl CrewMemory {
    pub fn new() -> Self {
        Self::with_budget(MAX_MEMORY_CHARS)
    }

    pub fn with_budget(budget: usize) -> Self {
        Self {
            entries: Vec::new(),
            budget,
        }
    }

    /// Records a completed task output
    pub fn remember(&mut self, agent_role: &str, output: &TaskOutput) {
        self.entries.push(MemoryEntry {
            agent_role: agent_role.to_string(),
            task_id: output.task_id.to_string(),
            text: output.raw_text.chars().take(self.budget).collect(),
        });

        while self.total_chars() > self.budget && self.entries.len() > 1 {
            self.entries.remove(0);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn total_chars(&self) -> usize {
        self.entries.iter().map(|e| e.text.chars().count()).sum()
    }

    /// Renders the memory for inclusion in an agent prompt
    pub fn for_prompt(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|e| format!("[{} / {}]\n{}", e.agent_role, e.task_id, e.text))
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskId;
    use chrono::Utc;

    fn output(id: &str, text: &str) -> TaskOutput {
        TaskOutput {
            task_id: TaskId::new(id),
            raw_text: text.to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_memory_renders_none() {
        assert!(CrewMemory::new().for_prompt().is_none());
    }

    #[test]
    fn memory_is_trimmed_from_the_oldest_entry() {
        let mut memory = CrewMemory::with_budget(10);
        memory.remember("Intake", &output("t1", "aaaaaa"));
        memory.remember("Mapper", &output("t2", "bbbbbb"));

        let rendered = memory.for_prompt().unwrap();
        assert!(!rendered.contains("aaaaaa"));
        assert!(rendered.starts_with("[Mapper / t2]"));
    }
}
