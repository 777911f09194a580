/// Asserts the exact sequence of history kinds recorded by a pet.
#[macro_export]
macro_rules! assert_history_kinds {
    ($pet:expr, [$($kind:ident),* $(,)?]) => {
        let kinds: Vec<pizzapets_data::HistoryKind> =
            $pet.history().iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![$(pizzapets_data::HistoryKind::$kind),*],
            "Unexpected history for {}",
            $pet.inscription_id()
        );
    };
}

/// Asserts that the pet is dead and its last history entry is a death at
/// the given height.
#[macro_export]
macro_rules! assert_died_at {
    ($pet:expr, $height:expr) => {
        let last = $pet.history().last().expect("History is empty");
        assert!(!$pet.is_alive(), "Pet {} should be dead", $pet.inscription_id());
        assert_eq!($pet.state().health, 0.0);
        assert_eq!(last.kind, pizzapets_data::HistoryKind::Death);
        assert_eq!(
            last.height, $height,
            "Pet {} died at {} instead of {}",
            $pet.inscription_id(),
            last.height,
            $height
        );
    };
}
