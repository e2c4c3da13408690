use crate::task::{Status, Task};

/// Per-column task counts shown in the board header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: Status| tasks.iter().filter(|t| t.status == status).count();
        Self {
            total: tasks.len(),
            todo: count(Status::Todo),
            in_progress: count(Status::InProgress),
            done: count(Status::Done),
        }
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use rstest::rstest;

    fn task(id: u64, status: Status) -> Task {
        Task {
            id: TaskId(id),
            title: format!("task {id}"),
            description: String::new(),
            status,
            created_at: "1/1/2026".to_string(),
        }
    }

    #[rstest]
    fn empty_board_has_zero_counts() {
        assert_eq!(Stats::from_tasks(&[]), Stats::default());
    }

    #[rstest]
    fn counts_partition_the_total() {
        let tasks = vec![
            task(1, Status::Todo),
            task(2, Status::Done),
            task(3, Status::InProgress),
            task(4, Status::Done),
        ];
        let stats = Stats::from_tasks(&tasks);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(Status::Todo), 1);
        assert_eq!(stats.count(Status::InProgress), 1);
        assert_eq!(stats.count(Status::Done), 2);
        assert_eq!(stats.total, stats.todo + stats.in_progress + stats.done);
    }
}
