use crate::model::Task;

/// Moves completed tasks after incomplete ones.
///
/// `sort_by_key` is a stable sort, so tasks with the same `completed` value
/// keep their relative (insertion) order. Do not replace it with an unstable
/// sort: every pair of equal-state tasks compares equal here.
pub fn sort_incomplete_first(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.completed);
}

/// Render order, derived on every render and never stored.
pub fn sorted_view(tasks: &[Task]) -> Vec<&Task> {
    let mut view: Vec<&Task> = tasks.iter().collect();
    view.sort_by_key(|t| t.completed);
    view
}

/// Render order with completed tasks optionally projected out.
pub fn visible_tasks(tasks: &[Task], hide_completed: bool) -> Vec<&Task> {
    let mut view = sorted_view(tasks);
    if hide_completed {
        view.retain(|t| !t.completed);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use pretty_assertions::assert_eq;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            text: id.to_string(),
            completed,
        }
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_sorted_view_is_stable_within_groups() {
        let tasks = vec![
            task("a", true),
            task("b", false),
            task("c", true),
            task("d", false),
            task("e", false),
            task("f", true),
        ];
        assert_eq!(ids(&sorted_view(&tasks)), vec!["b", "d", "e", "a", "c", "f"]);
    }

    #[test]
    fn test_sorted_view_all_same_state_keeps_order() {
        let tasks: Vec<_> = (0..20).map(|i| task(&format!("t{i:02}"), false)).collect();
        let expected: Vec<_> = tasks.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids(&sorted_view(&tasks)), expected);
    }

    #[test]
    fn test_every_incomplete_precedes_every_completed() {
        // deterministic pseudo-random mix
        let tasks: Vec<_> = (0..64u32)
            .map(|i| task(&format!("t{i}"), (i.wrapping_mul(2654435761) >> 7) % 3 == 0))
            .collect();
        let view = sorted_view(&tasks);
        let first_done = view.iter().position(|t| t.completed).unwrap_or(view.len());
        assert!(view[..first_done].iter().all(|t| !t.completed));
        assert!(view[first_done..].iter().all(|t| t.completed));

        let original_done: Vec<_> = tasks.iter().filter(|t| t.completed).map(|t| &t.id).collect();
        let view_done: Vec<_> = view[first_done..].iter().map(|t| &t.id).collect();
        assert_eq!(view_done, original_done);
    }

    #[test]
    fn test_sort_in_place_matches_view() {
        let mut tasks = vec![task("a", true), task("b", false), task("c", false)];
        let expected = ids(&sorted_view(&tasks));
        sort_incomplete_first(&mut tasks);
        let got: Vec<_> = tasks.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_visible_tasks_hides_completed() {
        let tasks = vec![task("a", true), task("b", false)];
        assert_eq!(ids(&visible_tasks(&tasks, false)), vec!["b", "a"]);
        assert_eq!(ids(&visible_tasks(&tasks, true)), vec!["b"]);
        // projection only
        assert_eq!(tasks.len(), 2);
    }
}
