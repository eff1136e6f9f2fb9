//! Property-based tests for the backend wire format.
//!
//! Uses proptest to verify:
//! 1. Any task the backend could send survives JSON decode/encode.
//! 2. Only the three column names parse as a status.
//! 3. Error bodies always produce at least one user-facing message and
//!    never panic on arbitrary bytes.

use proptest::prelude::*;
use taskboard_proto::envelope::{DataEnvelope, ErrorBody};
use taskboard_proto::task::{Task, TaskId, TaskStatus};

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-z0-9-]{1,24}",
        "[^\x00]{1,64}",
        "[^\x00]{0,128}",
        arb_status(),
        proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
    )
        .prop_map(|(id, title, description, status, assignee_email)| Task {
            id: TaskId::new(id),
            title,
            description,
            status,
            assignee_email,
        })
}

proptest! {
    #[test]
    fn task_list_envelope_survives_json(tasks in prop::collection::vec(arb_task(), 0..16)) {
        let envelope = DataEnvelope { data: tasks };
        let json = serde_json::to_vec(&envelope).unwrap();
        let decoded: DataEnvelope<Vec<Task>> = serde_json::from_slice(&json).unwrap();
        prop_assert_eq!(decoded, envelope);
    }

    #[test]
    fn only_column_names_parse(s in "\\PC{0,16}") {
        let parsed = s.parse::<TaskStatus>();
        let is_column = matches!(s.as_str(), "todo" | "in_progress" | "done");
        prop_assert_eq!(parsed.is_ok(), is_column);
    }

    #[test]
    fn error_body_always_has_a_message(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let body = ErrorBody::parse(&bytes);
        prop_assert!(!body.messages().is_empty());
    }
}
