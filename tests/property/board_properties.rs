//! Property-based tests for the board core.
//!
//! Uses proptest to verify, over arbitrary stores:
//! 1. The three columns partition the store exactly.
//! 2. Dropping a task on its own column changes nothing.
//! 3. A rejected move restores the moved task and touches nothing else.
//! 4. A committed move leaves the store equal to the server's list.
//! 5. A release inside the board always resolves to exactly one column.
//! 6. Rejected moves, settled in any order, restore the server's list.

use proptest::prelude::*;

use taskboard::api::ApiError;
use taskboard::board::drag::{Bounds, Point};
use taskboard::board::{
    Columns, ConfirmOutcome, Confirmation, DragController, DragOutcome, DropTarget, DropZones,
    OptimisticCoordinator, Settlement, TaskStore, resolve_drop,
};
use taskboard_proto::task::{Task, TaskId, TaskStatus};

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

/// Tasks with unique IDs `t0, t1, ...` and arbitrary statuses.
fn arb_tasks(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (
            "[A-Za-z ]{1,32}",
            arb_status(),
            proptest::option::of("[a-z]{1,8}@example\\.com"),
        ),
        0..max,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (title, status, assignee_email))| Task {
                id: TaskId::new(format!("t{i}")),
                title,
                description: format!("task number {i}"),
                status,
                assignee_email,
            })
            .collect()
    })
}

/// A non-empty store plus the index of one task in it.
fn arb_store_and_pick() -> impl Strategy<Value = (Vec<Task>, usize)> {
    arb_tasks(24)
        .prop_filter("need at least one task", |tasks| !tasks.is_empty())
        .prop_flat_map(|tasks| {
            let len = tasks.len();
            (Just(tasks), 0..len)
        })
}

/// A non-empty store, a sequence of moves (task index, column shift), and
/// an order in which to settle them.
fn arb_rejected_moves() -> impl Strategy<Value = (Vec<Task>, Vec<(usize, usize)>, Vec<usize>)> {
    arb_tasks(6)
        .prop_filter("need at least one task", |tasks| !tasks.is_empty())
        .prop_flat_map(|tasks| {
            let len = tasks.len();
            let moves = prop::collection::vec((0..len, 0usize..2), 1..8);
            (Just(tasks), moves)
        })
        .prop_flat_map(|(tasks, moves)| {
            let order = Just((0..moves.len()).collect::<Vec<_>>()).prop_shuffle();
            (Just(tasks), Just(moves), order)
        })
}

fn store_of(tasks: Vec<Task>) -> TaskStore {
    let mut store = TaskStore::new();
    store.replace_all(tasks);
    store
}

fn other_status(status: TaskStatus, shift: usize) -> TaskStatus {
    TaskStatus::ALL[(status.column_index() + 1 + shift % 2) % 3]
}

proptest! {
    #[test]
    fn columns_partition_the_store(tasks in arb_tasks(48)) {
        let columns = Columns::from_tasks(&tasks);
        prop_assert_eq!(columns.len(), tasks.len());

        for (status, column) in columns.iter() {
            prop_assert!(column.iter().all(|t| t.status == status));
        }
        for task in &tasks {
            let hits = columns
                .iter()
                .filter(|(_, column)| column.iter().any(|t| t.id == task.id))
                .count();
            prop_assert_eq!(hits, 1);
        }
        // Store order is kept inside each column.
        let expected: Vec<&Task> = tasks.iter().filter(|t| t.status == TaskStatus::Todo).collect();
        let actual: Vec<&Task> = columns.todo.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn drop_on_own_column_is_a_no_op((tasks, pick) in arb_store_and_pick()) {
        let store = store_of(tasks.clone());
        let revision = store.revision();
        let task = &tasks[pick];

        let mut drag = DragController::new();
        drag.on_drag_start(task.id.clone());
        let outcome = drag.on_drag_end(Some(DropTarget::Column(task.status)), &store);

        prop_assert!(matches!(outcome, DragOutcome::Discarded(_)));
        prop_assert_eq!(store.revision(), revision);
        prop_assert_eq!(store.snapshot(), tasks);
    }

    #[test]
    fn rejected_move_restores_exactly((tasks, pick) in arb_store_and_pick(), shift in 0usize..2) {
        let mut store = store_of(tasks.clone());
        let task = tasks[pick].clone();
        let to = other_status(task.status, shift);

        let mut drag = DragController::new();
        drag.on_drag_start(task.id.clone());
        let DragOutcome::Transition(request) =
            drag.on_drag_end(Some(DropTarget::Column(to)), &store)
        else {
            return Err(TestCaseError::fail("expected a transition"));
        };

        let mut coordinator = OptimisticCoordinator::new();
        let pending = coordinator.begin(&mut store, request);
        prop_assert_eq!(store.get(&task.id).map(|t| t.status), Some(to));

        let settlement = coordinator.settle(
            &mut store,
            Confirmation {
                pending,
                outcome: ConfirmOutcome::Rejected(ApiError::Transport("down".to_string())),
            },
        );
        prop_assert_eq!(settlement, Settlement::RolledBack);
        prop_assert_eq!(store.snapshot(), tasks);
        prop_assert_eq!(coordinator.in_flight(), 0);
    }

    #[test]
    fn committed_move_equals_server_list(
        (tasks, pick) in arb_store_and_pick(),
        shift in 0usize..2,
        server in arb_tasks(24),
    ) {
        let mut store = store_of(tasks.clone());
        let task = tasks[pick].clone();
        let to = other_status(task.status, shift);

        let mut drag = DragController::new();
        drag.on_drag_start(task.id.clone());
        let DragOutcome::Transition(request) =
            drag.on_drag_end(Some(DropTarget::Column(to)), &store)
        else {
            return Err(TestCaseError::fail("expected a transition"));
        };

        let mut coordinator = OptimisticCoordinator::new();
        let pending = coordinator.begin(&mut store, request);
        let settlement = coordinator.settle(
            &mut store,
            Confirmation {
                pending,
                outcome: ConfirmOutcome::Committed(server.clone()),
            },
        );
        prop_assert_eq!(settlement, Settlement::Committed);
        prop_assert_eq!(store.snapshot(), server);
    }

    #[test]
    fn rejected_moves_in_any_order_restore_server((tasks, moves, order) in arb_rejected_moves()) {
        let mut store = store_of(tasks.clone());
        let mut drag = DragController::new();
        let mut coordinator = OptimisticCoordinator::new();

        let mut pending = Vec::new();
        for (pick, shift) in moves {
            let id = tasks[pick].id.clone();
            let current = store
                .get(&id)
                .map(|t| t.status)
                .ok_or_else(|| TestCaseError::fail("task vanished"))?;
            drag.on_drag_start(id);
            let DragOutcome::Transition(request) =
                drag.on_drag_end(Some(DropTarget::Column(other_status(current, shift))), &store)
            else {
                return Err(TestCaseError::fail("expected a transition"));
            };
            pending.push(coordinator.begin(&mut store, request));
        }

        for index in order {
            coordinator.settle(
                &mut store,
                Confirmation {
                    pending: pending[index].clone(),
                    outcome: ConfirmOutcome::Rejected(ApiError::Transport("down".to_string())),
                },
            );
        }
        prop_assert_eq!(store.snapshot(), tasks);
        prop_assert_eq!(coordinator.in_flight(), 0);
    }

    #[test]
    fn release_inside_board_hits_one_column(
        widths in prop::array::uniform3(1u16..40),
        gap in 0u16..6,
        x in 0u16..200,
        y in 0u16..30,
    ) {
        let mut columns = [Bounds::default(); 3];
        let mut left = 0u16;
        for (column, width) in columns.iter_mut().zip(widths) {
            *column = Bounds { x: left, y: 0, width, height: 30 };
            left += width + gap;
        }
        let board = Bounds { x: 0, y: 0, width: left - gap, height: 30 };
        let zones = DropZones { board, columns };
        let point = Point { x, y };

        let resolved = resolve_drop(point, &zones);
        if board.contains(point) {
            let status = resolved.ok_or_else(|| TestCaseError::fail("no column inside board"))?;
            let inside = TaskStatus::ALL
                .into_iter()
                .find(|s| columns[s.column_index()].contains(point));
            if let Some(hit) = inside {
                prop_assert_eq!(status, hit);
            }
        } else {
            prop_assert_eq!(resolved, None);
        }
    }
}
