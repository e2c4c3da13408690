use crate::error::{BoardError, BoardResult};
use crate::export::{export_file_name, ExportDocument};
use crate::stats::Stats;
use crate::storage::{KeyValueStore, TASKS_KEY};
use crate::task::{Status, Task, TaskId};
use mockable::Clock;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What `load` found in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet; the board starts empty.
    Missing,
    /// Stored tasks were read.
    Loaded(usize),
    /// The stored value was unreadable; the board was reset to empty.
    Recovered,
}

/// The task store. Sole owner and writer of the task collection; every
/// mutation is persisted before it returns.
#[derive(Debug)]
pub struct KanbanBoard<S, C> {
    tasks: Vec<Task>,
    store: S,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> KanbanBoard<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            store,
            clock,
        }
    }

    /// Creates a board and loads whatever the store holds.
    pub fn open(store: S, clock: C) -> Self {
        let mut board = Self::new(store, clock);
        board.load();
        board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_by_status(&self, status: Status) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.tasks)
    }

    pub fn add_task(&mut self, title: &str, description: &str) -> BoardResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }

        let id = TaskId::next(
            self.clock.utc().timestamp_millis(),
            self.tasks.iter().map(|t| &t.id),
        );
        let task = Task {
            id,
            title: title.to_string(),
            description: description.trim().to_string(),
            status: Status::Todo,
            created_at: self.clock.local().format("%-m/%-d/%Y").to_string(),
        };
        self.tasks.push(task.clone());
        info!(id = %task.id, title = %task.title, "Added task");
        self.save();
        Ok(task)
    }

    /// Removes the first task with `id`. An unknown id is not an error.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(index);
        info!(id = %id, "Deleted task");
        self.save();
        Some(task)
    }

    /// Moves the first task with `id` to `status`. Returns false if no task
    /// has that id.
    pub fn set_status(&mut self, id: TaskId, status: Status) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id = %id, "Status change for unknown task ignored");
            return false;
        };
        let from = task.status;
        task.status = status;
        info!(id = %id, %from, to = %status, "Moved task");
        self.save();
        true
    }

    pub fn clear_all(&mut self) -> BoardResult<()> {
        if self.tasks.is_empty() {
            return Err(BoardError::EmptyCollection);
        }
        let cleared = self.tasks.len();
        self.tasks.clear();
        info!(cleared, "Cleared all tasks");
        self.save();
        Ok(())
    }

    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match self.read_stored() {
            Ok(None) => {
                self.tasks = Vec::new();
                LoadOutcome::Missing
            }
            Ok(Some(tasks)) => {
                self.tasks = tasks;
                LoadOutcome::Loaded(self.tasks.len())
            }
            Err(err) => {
                error!(error = %err, "Error loading tasks, starting with an empty board");
                self.tasks = Vec::new();
                LoadOutcome::Recovered
            }
        };
        self.warn_on_duplicate_ids();
        outcome
    }

    fn read_stored(&self) -> BoardResult<Option<Vec<Task>>> {
        match self.store.get(TASKS_KEY)? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    fn warn_on_duplicate_ids(&self) {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                warn!(id = %task.id, "Stored board contains a duplicate task id");
            }
        }
    }

    /// Best-effort write of the whole collection.
    pub fn save(&self) {
        let result = serde_json::to_string(&self.tasks)
            .map_err(BoardError::from)
            .and_then(|data| Ok(self.store.set(TASKS_KEY, &data)?));
        if let Err(err) = result {
            error!(error = %err, "Failed to save tasks");
        }
    }

    /// Writes `kanban-board-<date>.json` into `dir` and returns its path.
    pub fn export_to(&self, dir: &Path) -> BoardResult<PathBuf> {
        if self.tasks.is_empty() {
            return Err(BoardError::EmptyCollection);
        }
        let export_date = self
            .clock
            .local()
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        let json = ExportDocument::new(export_date, &self.tasks).to_json()?;

        fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(self.clock.utc().date_naive()));
        fs::write(&path, json)?;
        info!(path = %path.display(), tasks = self.tasks.len(), "Exported board");
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    /// Clock frozen at a fixed instant.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
    pub(crate) fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
    }

    fn board(clock: FixedClock) -> KanbanBoard<MemoryStore, FixedClock> {
        KanbanBoard::new(MemoryStore::new(), clock)
    }

    #[rstest]
    fn add_task_starts_in_todo(clock: FixedClock) {
        let mut board = board(clock);
        let task = board.add_task("  Write spec ", "").expect("add");
        assert_eq!(task.title, "Write spec");
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.id, TaskId(clock.0.timestamp_millis() as u64));
        assert_eq!(board.stats().todo, 1);
    }

    #[rstest]
    fn ids_stay_unique_within_one_clock_tick(clock: FixedClock) {
        let mut board = board(clock);
        let a = board.add_task("a", "").expect("add a");
        let b = board.add_task("b", "").expect("add b");
        let c = board.add_task("c", "").expect("add c");
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert!(a.id < b.id && b.id < c.id);
    }

    #[rstest]
    fn add_after_max_stored_id_picks_unused_id(clock: FixedClock) {
        let stored = format!(
            r#"[{{"id":{},"title":"last","description":"","status":"todo","createdAt":"x"}}]"#,
            u64::MAX
        );
        let mut board = KanbanBoard::open(MemoryStore::with_value(TASKS_KEY, stored), clock);
        assert_eq!(board.len(), 1);

        let task = board.add_task("next", "").expect("add");
        assert_eq!(task.id, TaskId(0));
        assert_ne!(task.id, TaskId(u64::MAX));
        assert_eq!(board.len(), 2);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_title_is_rejected(clock: FixedClock, #[case] title: &str) {
        let mut board = board(clock);
        let result = board.add_task(title, "description");
        assert!(matches!(result, Err(BoardError::EmptyTitle)));
        assert!(board.is_empty());
        assert_eq!(board.store().value(TASKS_KEY), None);
    }

    #[rstest]
    fn delete_unknown_id_is_a_noop(clock: FixedClock) {
        let mut board = board(clock);
        board.add_task("keep", "").expect("add");
        assert_eq!(board.delete_task(TaskId(1)), None);
        assert_eq!(board.len(), 1);
    }

    #[rstest]
    fn delete_with_duplicate_ids_removes_first_only(clock: FixedClock) {
        let stored = r#"[
            {"id":5,"title":"first","description":"","status":"todo","createdAt":"x"},
            {"id":5,"title":"second","description":"","status":"done","createdAt":"x"}
        ]"#;
        let mut board = KanbanBoard::open(MemoryStore::with_value(TASKS_KEY, stored), clock);
        let removed = board.delete_task(TaskId(5)).expect("removed");
        assert_eq!(removed.title, "first");
        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks()[0].title, "second");
    }

    #[rstest]
    fn set_status_only_touches_status(clock: FixedClock) {
        let mut board = board(clock);
        let before = board.add_task("Move me", "somewhere").expect("add");
        assert!(board.set_status(before.id, Status::Done));
        let after = board.get(before.id).expect("still present");
        assert_eq!(after.status, Status::Done);
        assert_eq!(
            (&after.id, &after.title, &after.description, &after.created_at),
            (&before.id, &before.title, &before.description, &before.created_at)
        );
    }

    #[rstest]
    fn set_status_unknown_id_is_a_noop(clock: FixedClock) {
        let mut board = board(clock);
        assert!(!board.set_status(TaskId(9), Status::Done));
    }

    #[rstest]
    fn clear_all_rejects_empty_board(clock: FixedClock) {
        let mut board = board(clock);
        assert!(matches!(board.clear_all(), Err(BoardError::EmptyCollection)));
        assert!(board.is_empty());
    }

    #[rstest]
    fn clear_all_empties_and_persists(clock: FixedClock) {
        let mut board = board(clock);
        board.add_task("a", "").expect("add");
        board.add_task("b", "").expect("add");
        board.clear_all().expect("clear");
        assert!(board.is_empty());
        assert_eq!(board.store().value(TASKS_KEY).as_deref(), Some("[]"));
    }

    #[rstest]
    fn mutations_keep_stats_consistent(clock: FixedClock) {
        let mut board = board(clock);
        let a = board.add_task("a", "").expect("add");
        let b = board.add_task("b", "").expect("add");
        board.add_task("c", "").expect("add");
        board.set_status(a.id, Status::InProgress);
        board.set_status(b.id, Status::Done);
        board.delete_task(a.id);
        let stats = board.stats();
        assert_eq!(stats.total, stats.todo + stats.in_progress + stats.done);
        assert_eq!((stats.total, stats.todo, stats.done), (2, 1, 1));
    }

    #[rstest]
    fn persisted_board_round_trips(clock: FixedClock) {
        let store = MemoryStore::new();
        let mut board = KanbanBoard::new(&store, clock);
        let a = board.add_task("a", "alpha").expect("add");
        board.add_task("b", "").expect("add");
        board.set_status(a.id, Status::Done);

        let reloaded = KanbanBoard::open(&store, clock);
        assert_eq!(reloaded.tasks(), board.tasks());
    }

    #[rstest]
    #[case("not json")]
    #[case("{\"id\": 1}")]
    #[case("[{\"id\":1,\"title\":\"t\",\"status\":\"blocked\",\"createdAt\":\"x\"}]")]
    fn corrupted_store_recovers_to_empty(clock: FixedClock, #[case] stored: &str) {
        let mut board = KanbanBoard::new(MemoryStore::with_value(TASKS_KEY, stored), clock);
        assert_eq!(board.load(), LoadOutcome::Recovered);
        assert!(board.is_empty());
    }

    #[rstest]
    fn missing_store_value_loads_empty(clock: FixedClock) {
        let mut board = board(clock);
        assert_eq!(board.load(), LoadOutcome::Missing);
        assert!(board.is_empty());
    }

    #[rstest]
    fn export_rejects_empty_board(clock: FixedClock) {
        let dir = tempfile::tempdir().expect("tempdir");
        let board = board(clock);
        assert!(matches!(
            board.export_to(dir.path()),
            Err(BoardError::EmptyCollection)
        ));
    }

    #[rstest]
    fn export_writes_dated_document(clock: FixedClock) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board(clock);
        board.add_task("a", "").expect("add");
        let path = board.export_to(dir.path()).expect("export");
        assert!(path.ends_with("kanban-board-2026-10-18.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("decode");
        assert_eq!(value["totalTasks"], 1);
        assert_eq!(value["tasks"][0]["title"], "a");
    }
}
