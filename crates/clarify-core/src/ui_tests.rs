use super::*;

const ALL_STATES: [UiState; 7] = [
    UiState::Hidden,
    UiState::AnchorVisible(MenuKind::Actions),
    UiState::AnchorVisible(MenuKind::Restore),
    UiState::Loading,
    UiState::ResultSuccess,
    UiState::ResultFailed,
    UiState::ResultApplied,
];

#[test]
fn test_selection_always_shows_menu() {
    for state in ALL_STATES {
        assert_eq!(
            state.transition(UiAction::Select),
            Some(UiState::AnchorVisible(MenuKind::Actions))
        );
        assert_eq!(
            state.transition(UiAction::SelectRegion),
            Some(UiState::AnchorVisible(MenuKind::Restore))
        );
    }
}

#[test]
fn test_remote_lifecycle() {
    let state = UiState::AnchorVisible(MenuKind::Actions);
    let state = state.transition(UiAction::InvokeRemote).unwrap();
    assert_eq!(state, UiState::Loading);
    assert!(state.result_visible());
    assert!(state.result_actions().is_empty());

    let success = state.transition(UiAction::Succeed).unwrap();
    assert_eq!(success.result_actions(), &[ResultAction::Copy, ResultAction::Apply]);

    let applied = success.transition(UiAction::Apply).unwrap();
    assert_eq!(applied.result_actions(), &[ResultAction::Done, ResultAction::Undo]);

    assert_eq!(applied.transition(UiAction::Undo), Some(UiState::ResultSuccess));
    assert_eq!(applied.transition(UiAction::Close), Some(UiState::Hidden));
    assert_eq!(state.transition(UiAction::Fail), Some(UiState::ResultFailed));
}

#[test]
fn test_invoke_requires_action_menu() {
    for state in ALL_STATES {
        let allowed = state == UiState::AnchorVisible(MenuKind::Actions);
        assert_eq!(state.transition(UiAction::InvokeRemote).is_some(), allowed, "{state:?}");
        assert_eq!(state.transition(UiAction::InvokeLocal).is_some(), allowed, "{state:?}");
    }
}

#[test]
fn test_dismiss_only_hides_menus() {
    assert_eq!(
        UiState::AnchorVisible(MenuKind::Restore).transition(UiAction::Dismiss),
        Some(UiState::Hidden)
    );
    assert_eq!(UiState::ResultSuccess.transition(UiAction::Dismiss), None);
    assert_eq!(UiState::Hidden.transition(UiAction::Dismiss), None);
}

#[test]
fn test_outcomes_only_land_while_loading() {
    for state in ALL_STATES {
        let loading = state == UiState::Loading;
        assert_eq!(state.transition(UiAction::Succeed).is_some(), loading);
        assert_eq!(state.transition(UiAction::Fail).is_some(), loading);
    }
}

#[test]
fn test_invalid_transitions() {
    assert_eq!(UiState::ResultFailed.transition(UiAction::Apply), None);
    assert_eq!(UiState::ResultSuccess.transition(UiAction::Undo), None);
    assert_eq!(UiState::Hidden.transition(UiAction::Close), None);
    assert_eq!(UiState::AnchorVisible(MenuKind::Actions).transition(UiAction::Restore), None);
}

#[test]
fn test_menu_rect_uses_kind_size() {
    let placement = MenuPlacement {
        kind: MenuKind::Restore,
        position: Point::new(10.0, 20.0),
    };
    assert_eq!(placement.rect(), BoundingBox::new(10.0, 20.0, 140.0, 50.0));
    assert_eq!(UiState::AnchorVisible(MenuKind::Actions).menu(), Some(MenuKind::Actions));
    assert_eq!(UiState::Loading.menu(), None);
}

#[test]
fn test_copy_label_resets_after_hold() {
    let start = Instant::now();
    let mut label = CopyLabel::new(Duration::from_millis(2000));
    assert_eq!(label.label_at(start), COPY_LABEL);

    label.mark_copied(start);
    assert_eq!(label.label_at(start + Duration::from_millis(1999)), COPIED_LABEL);
    assert_eq!(label.label_at(start + Duration::from_millis(2000)), COPY_LABEL);

    label.mark_copied(start);
    label.reset();
    assert_eq!(label.label_at(start), COPY_LABEL);
}

#[test]
fn test_render_error() {
    assert_eq!(render_error("API Request Failed"), "Error: API Request Failed");
}
