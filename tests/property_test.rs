use proptest::prelude::*;
use redline::buffer::{LineBuffer, TrackedBuffer};
use redline::diff::{diff_texts, ChangeId, ChangeRecord};
use redline::patch::patch_text;
use redline::persist::MemoryPersister;
use redline::preview::{InlineOverlay, PreviewRenderer, Renderer, SidePanel};
use redline::session::{SessionController, SessionState};

type Controller = SessionController<LineBuffer, Renderer, MemoryPersister>;

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{0,2}", 0..8).prop_map(|lines| lines.join("\n"))
}

fn controller(original: &str, panel: bool) -> Controller {
    let renderer = if panel {
        Renderer::Panel(SidePanel::default())
    } else {
        Renderer::Inline(InlineOverlay::default())
    };
    SessionController::new(LineBuffer::from_text(original), renderer, MemoryPersister::new())
}

fn ids(controller: &Controller) -> Vec<ChangeId> {
    controller.views().iter().map(|view| view.id).collect()
}

proptest! {
    #[test]
    fn accept_all_yields_proposed_text(old in text(), new in text(), panel in any::<bool>()) {
        let mut controller = controller(&old, panel);
        controller.start_session(&old, &new, "f.txt").unwrap();
        if controller.state() != SessionState::Closed {
            controller.accept_all().unwrap();
        }

        prop_assert_eq!(controller.text(), new);
        prop_assert_eq!(controller.state(), SessionState::Closed);
    }

    #[test]
    fn reject_all_restores_original(old in text(), new in text(), panel in any::<bool>()) {
        let mut controller = controller(&old, panel);
        controller.start_session(&old, &new, "f.txt").unwrap();
        if controller.state() != SessionState::Closed {
            controller.reject_all().unwrap();
        }

        prop_assert_eq!(controller.text(), old);
        prop_assert!(controller.persister().writes.is_empty());
    }

    #[test]
    fn any_decision_order_matches_fresh_patch(
        old in text(),
        new in text(),
        mask in prop::collection::vec(any::<bool>(), 16),
        reverse in any::<bool>(),
    ) {
        let mut controller = controller(&old, false);
        controller.start_session(&old, &new, "f.txt").unwrap();

        let mut order = ids(&controller);
        if reverse {
            order.reverse();
        }
        for id in order {
            let decided = if mask[id.0 as usize % mask.len()] {
                controller.accept(id).unwrap()
            } else {
                controller.reject(id).unwrap()
            };
            prop_assert!(decided.transitioned);

            let summary = controller.summary().unwrap();
            prop_assert_eq!(summary.pending + summary.accepted + summary.rejected, summary.total);
        }

        let expected = patch_text(&old, &diff_texts(&old, &new), |record| {
            mask[record.id.0 as usize % mask.len()]
        });
        prop_assert_eq!(controller.text(), expected);
        prop_assert_eq!(controller.state(), SessionState::Closed);
    }

    #[test]
    fn discard_restores_original(
        old in text(),
        new in text(),
        mask in prop::collection::vec(any::<bool>(), 16),
    ) {
        let mut controller = controller(&old, false);
        controller.start_session(&old, &new, "f.txt").unwrap();

        let ids = ids(&controller);
        // Leave the last change pending so the session stays open.
        for id in ids.iter().take(ids.len().saturating_sub(1)) {
            if mask[id.0 as usize % mask.len()] {
                controller.accept(*id).unwrap();
            } else {
                controller.reject(*id).unwrap();
            }
        }

        if controller.state().is_active() {
            prop_assert!(controller.discard().unwrap());
        }
        prop_assert_eq!(controller.text(), old);
        prop_assert!(controller.persister().writes.is_empty());
    }

    #[test]
    fn accepted_text_is_persisted_once(old in text(), new in text()) {
        let mut controller = controller(&old, false);
        controller.start_session(&old, &new, "f.txt").unwrap();
        if controller.state() != SessionState::Closed {
            controller.accept_all().unwrap();
            prop_assert_eq!(controller.persister().writes.len(), 1);
            prop_assert_eq!(&controller.persister().writes[0].1, &new);
        } else {
            prop_assert!(controller.persister().writes.is_empty());
        }
    }

    #[test]
    fn overlay_keeps_every_anchor_valid(old in text(), new in text()) {
        let records = diff_texts(&old, &new);
        let refs: Vec<&ChangeRecord> = records.iter().collect();
        let mut target = TrackedBuffer::new(LineBuffer::from_text(&old));
        let mut overlay = InlineOverlay::default();

        overlay.show_all(&mut target, &refs);

        for record in &records {
            if let Some(old_content) = record.old_content() {
                let line = target.position_of_base(record.anchor_line);
                prop_assert!(line.is_some(), "{} lost its original line", record.id);
                prop_assert_eq!(line.and_then(|line| target.line(line)), Some(old_content));
            }
        }
        prop_assert_eq!(diff_texts(&old, &new), records);

        overlay.retract_all(&mut target);
        prop_assert_eq!(target.text(), old);
    }
}
