use image::{Rgba, RgbaImage};
use std::future::Future;
use std::sync::Mutex;
use testoloji_crop::*;
use testoloji_layout::{AnswerLetter, Difficulty};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 1200x1600 page with two dark question blocks
fn exam_page() -> RgbaImage {
    let blocks = [SourceRect::new(100, 100, 800, 300), SourceRect::new(100, 600, 900, 400)];
    RgbaImage::from_fn(1200, 1600, |x, y| {
        if blocks
            .iter()
            .any(|b| x >= b.x && x < b.right() && y >= b.y && y < b.bottom())
        {
            BLACK
        } else {
            WHITE
        }
    })
}

/// Page shown at half size
fn session() -> CropSession {
    let mut session = CropSession::default();
    session.open_page(PageSource::new("deneme.pdf", 3), exam_page(), DisplaySize::new(600.0, 800.0));
    session
}

fn drag(session: &mut CropSession, rect: DisplayRect) -> DraftOutcome {
    session.begin_draft(DisplayPoint::new(rect.x, rect.y));
    session.update_draft(DisplayPoint::new(rect.right(), rect.bottom()));
    session.finish_draft()
}

fn enter() -> KeyPress {
    KeyPress {
        key: Key::Enter,
        text_input_focused: false,
    }
}

#[test]
fn test_coordinate_round_trip_within_one_pixel() {
    let sizes = [(1200, 1600, 600.0, 800.0), (2480, 3508, 793.7, 1122.5), (1000, 1000, 1333.0, 1333.0)];
    let rects = [
        DisplayRect::new(0.0, 0.0, 10.0, 10.0),
        DisplayRect::new(13.3, 47.9, 211.2, 98.6),
        DisplayRect::new(100.5, 200.25, 300.75, 5.5),
    ];

    for (native_w, native_h, display_w, display_h) in sizes {
        let canvas = CanvasSnapshot::new(native_w, native_h, DisplaySize::new(display_w, display_h));
        for rect in rects {
            let back = canvas.to_display(canvas.to_source(rect));
            assert!((back.x - rect.x).abs() <= 1.0, "{rect:?} -> {back:?}");
            assert!((back.y - rect.y).abs() <= 1.0, "{rect:?} -> {back:?}");
            assert!((back.width - rect.width).abs() <= 1.0, "{rect:?} -> {back:?}");
            assert!((back.height - rect.height).abs() <= 1.0, "{rect:?} -> {back:?}");
        }
    }
}

#[test]
fn test_round_trip_when_magnified_stays_within_a_source_pixel() {
    // 1000 px raster shown at 4000 px: one source pixel is 4 display px
    let canvas = CanvasSnapshot::new(1000, 1000, DisplaySize::new(4000.0, 4000.0));
    let source_px = 1.0 / canvas.scale_x();
    assert_eq!(source_px, 4.0);

    let rects = [
        DisplayRect::new(1.9, 1.9, 40.0, 40.0),
        DisplayRect::new(13.3, 47.9, 211.2, 98.6),
        DisplayRect::new(3999.0, 10.0, 0.5, 7.0),
    ];
    for rect in rects {
        let source = canvas.to_source(rect);
        let back = canvas.to_display(source);
        assert!((back.x - rect.x).abs() <= source_px / 2.0, "{rect:?} -> {back:?}");
        assert!((back.y - rect.y).abs() <= source_px / 2.0, "{rect:?} -> {back:?}");
        assert!((back.right() - rect.right()).abs() <= source_px / 2.0, "{rect:?} -> {back:?}");
        assert!((back.bottom() - rect.bottom()).abs() <= source_px / 2.0, "{rect:?} -> {back:?}");
        // Whole pixels map back onto the display grid
        assert_eq!(back.x % source_px, 0.0);
    }
}

#[test]
fn test_noise_draft_is_discarded() {
    let mut session = session();
    let outcome = drag(&mut session, DisplayRect::new(10.0, 10.0, 3.0, 200.0));

    assert_eq!(outcome, DraftOutcome::Ignored);
    assert_eq!(session.selected_crop(), None);
    assert!(matches!(session.add_to_queue(), Err(CropError::NoSelection)));
    assert!(session.queue().is_empty());
}

#[test]
fn test_queue_stores_source_rect() {
    let mut session = session();
    let DraftOutcome::Selected(crop) = drag(&mut session, DisplayRect::new(40.0, 30.0, 200.0, 100.0)) else {
        panic!("expected a selection");
    };
    assert_eq!(crop, SourceRect::new(80, 60, 400, 200));

    session.set_answer(Some(AnswerLetter::B));
    session.set_difficulty(Some(Difficulty::new(6).unwrap()));
    let id = session.add_to_queue().unwrap();

    let queue = session.queue();
    assert_eq!(queue.len(), 1);
    let item = queue.get(id).unwrap();
    assert_eq!(item.rect, crop);
    assert_eq!(item.page, 3);
    assert_eq!(item.pdf_name, "deneme.pdf");
    assert_eq!(item.answer, Some(AnswerLetter::B));
    assert_eq!(item.difficulty.map(|d| d.value()), Some(6));
    assert_eq!(item.preview.dimensions(), (400, 200));
    // (100,100) on the page is (20,40) in the preview
    assert_eq!(*item.preview.get_pixel(20, 40), BLACK);
    assert_eq!(*item.preview.get_pixel(19, 40), WHITE);

    // Reset for the next question
    assert_eq!(session.selection(), &SelectionState::Idle);
    assert_eq!(session.answer(), None);
    assert_eq!(session.difficulty(), None);
}

#[test]
fn test_remove_from_queue_leaves_others() {
    let mut session = session();
    let mut ids = Vec::new();
    for i in 0..3 {
        drag(&mut session, DisplayRect::new(10.0 * i as f32, 10.0, 50.0, 50.0));
        ids.push(session.add_to_queue().unwrap());
    }
    let before: Vec<_> = session.queue().iter().cloned().collect();

    assert!(session.remove_from_queue(ids[1]));
    assert!(!session.remove_from_queue(ids[1]));

    let after: Vec<_> = session.queue().iter().cloned().collect();
    assert_eq!(after, vec![before[0].clone(), before[2].clone()]);
    assert!(session.queue().get(ids[1]).is_none());

    // Ids are not reused
    drag(&mut session, DisplayRect::new(0.0, 0.0, 50.0, 50.0));
    let next = session.add_to_queue().unwrap();
    assert!(!ids.contains(&next));
}

#[test]
fn test_enter_queues_only_with_selection_and_no_text_focus() {
    let mut session = session();
    assert_eq!(session.handle_key(enter()), KeyAction::Ignored);

    drag(&mut session, DisplayRect::new(40.0, 30.0, 200.0, 100.0));
    let focused = KeyPress {
        key: Key::Enter,
        text_input_focused: true,
    };
    assert_eq!(session.handle_key(focused), KeyAction::Ignored);
    assert!(session.queue().is_empty());

    let KeyAction::Queued(id) = session.handle_key(enter()) else {
        panic!("expected Enter to queue the selection");
    };
    assert!(session.queue().get(id).is_some());
    assert_eq!(session.handle_key(enter()), KeyAction::Ignored);
    assert_eq!(session.queue().len(), 1);
}

#[test]
fn test_enter_ignored_when_tool_closed() {
    let mut session = session();
    drag(&mut session, DisplayRect::new(40.0, 30.0, 200.0, 100.0));
    session.close();
    assert_eq!(session.handle_key(enter()), KeyAction::Ignored);
    assert!(session.queue().is_empty());
}

#[test]
fn test_magnet_snaps_to_block() {
    let mut session = session();
    session.set_magnet(true);

    // Loosely around the first block (100..900 x 100..400 in source pixels)
    let outcome = drag(&mut session, DisplayRect::new(40.0, 40.0, 440.0, 180.0));
    let padding = session.options().snap.padding_px;
    let expected = SourceRect::new(100 - padding, 100 - padding, 800 + 2 * padding, 300 + 2 * padding);
    assert_eq!(outcome, DraftOutcome::Selected(expected));

    let overlay = session.selection_display().unwrap();
    assert_eq!(overlay.x, (100 - padding) as f32 / 2.0);
    assert_eq!(overlay.width, (800 + 2 * padding) as f32 / 2.0);
}

#[test]
fn test_magic_scan_populates_detected() {
    let mut session = session();
    session.set_magic_mode(true);

    let DraftOutcome::ScanRequested(request) = drag(&mut session, DisplayRect::new(0.0, 0.0, 600.0, 800.0)) else {
        panic!("expected a scan request");
    };
    assert_eq!(request.region, SourceRect::new(0, 0, 1200, 1600));
    assert_eq!(request.ticket.page, 3);

    let detector = WhitespaceDetector::new(DetectorOptions {
        padding_px: 0,
        ..DetectorOptions::default()
    });
    assert_eq!(session.run_scan(&detector, &request), ScanOutcome::Found(2));
    assert!(!session.magic_mode());
    assert_eq!(session.selection(), &SelectionState::Idle);
    assert_eq!(
        session.detected(),
        &[SourceRect::new(100, 100, 800, 300), SourceRect::new(100, 600, 900, 400)]
    );
    assert_eq!(
        session.detected_display()[1],
        DisplayRect::new(50.0, 300.0, 450.0, 200.0)
    );

    // Accept the second one
    assert_eq!(session.handle_rect_click(1), Some(SourceRect::new(100, 600, 900, 400)));
    assert_eq!(session.detected().len(), 1);
    assert_eq!(session.selected_crop(), Some(SourceRect::new(100, 600, 900, 400)));

    assert_eq!(session.remove_detected(0), Some(SourceRect::new(100, 100, 800, 300)));
    assert!(session.detected().is_empty());
    assert_eq!(session.handle_rect_click(0), None);
}

#[test]
fn test_stale_scan_is_discarded() {
    let mut session = session();
    session.set_magic_mode(true);
    let DraftOutcome::ScanRequested(request) = drag(&mut session, DisplayRect::new(0.0, 0.0, 600.0, 800.0)) else {
        panic!("expected a scan request");
    };

    // User moves on before the result arrives
    session.open_page(PageSource::new("deneme.pdf", 4), exam_page(), DisplaySize::new(600.0, 800.0));
    let outcome = session.apply_scan_result(request.ticket, Ok(vec![SourceRect::new(1, 1, 10, 10)]));

    assert_eq!(outcome, ScanOutcome::Stale);
    assert!(session.detected().is_empty());
    assert!(session.take_notices().is_empty());
}

#[test]
fn test_superseded_scan_is_discarded() {
    let mut session = session();
    session.set_magic_mode(true);
    let DraftOutcome::ScanRequested(first) = drag(&mut session, DisplayRect::new(0.0, 0.0, 300.0, 300.0)) else {
        panic!("expected a scan request");
    };
    let DraftOutcome::ScanRequested(second) = drag(&mut session, DisplayRect::new(0.0, 200.0, 300.0, 300.0)) else {
        panic!("expected a scan request");
    };

    assert_eq!(session.apply_scan_result(first.ticket, Ok(vec![SourceRect::new(0, 0, 5, 5)])), ScanOutcome::Stale);
    assert_eq!(
        session.apply_scan_result(second.ticket, Ok(vec![SourceRect::new(0, 400, 50, 50)])),
        ScanOutcome::Found(1)
    );
}

#[test]
fn test_scan_failure_and_empty_result_become_notices() {
    let mut session = session();

    session.set_magic_mode(true);
    let DraftOutcome::ScanRequested(request) = drag(&mut session, DisplayRect::new(0.0, 0.0, 100.0, 100.0)) else {
        panic!("expected a scan request");
    };
    let outcome = session.apply_scan_result(request.ticket, Err(DetectError::Failed("timeout".to_string())));
    assert_eq!(outcome, ScanOutcome::Failed);
    assert!(!session.magic_mode());
    let notices = session.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("timeout"));

    session.set_magic_mode(true);
    let DraftOutcome::ScanRequested(request) = drag(&mut session, DisplayRect::new(0.0, 0.0, 100.0, 100.0)) else {
        panic!("expected a scan request");
    };
    assert_eq!(session.apply_scan_result(request.ticket, Ok(Vec::new())), ScanOutcome::Empty);
    assert_eq!(session.take_notices()[0].level, NoticeLevel::Info);
    assert_eq!(session.selection(), &SelectionState::Idle);
}

#[test]
fn test_new_scan_extends_detected() {
    let mut session = session();
    for region in [DisplayRect::new(0.0, 0.0, 600.0, 250.0), DisplayRect::new(0.0, 250.0, 600.0, 550.0)] {
        session.set_magic_mode(true);
        let DraftOutcome::ScanRequested(request) = drag(&mut session, region) else {
            panic!("expected a scan request");
        };
        session.run_scan(&WhitespaceDetector::default(), &request);
    }
    assert_eq!(session.detected().len(), 2);
}

struct FailingUploader;

impl QuestionUploader for FailingUploader {
    fn upload(&self, _batch: &[PendingQuestion]) -> impl Future<Output = testoloji_crop::Result<usize>> + Send {
        async { Err(CropError::Upload("server unavailable".to_string())) }
    }
}

#[derive(Default)]
struct RecordingUploader {
    received: Mutex<Vec<PendingId>>,
}

impl QuestionUploader for RecordingUploader {
    fn upload(&self, batch: &[PendingQuestion]) -> impl Future<Output = testoloji_crop::Result<usize>> + Send {
        let ids: Vec<PendingId> = batch.iter().map(|q| q.id).collect();
        async move {
            let count = ids.len();
            self.received.lock().unwrap().extend(ids);
            Ok(count)
        }
    }
}

fn session_with_queue(count: usize) -> CropSession {
    let mut session = session();
    for i in 0..count {
        drag(&mut session, DisplayRect::new(20.0 * i as f32, 20.0, 100.0, 100.0));
        session.add_to_queue().unwrap();
    }
    session
}

#[tokio::test]
async fn test_failed_upload_keeps_queue() {
    let mut session = session_with_queue(3);
    let before: Vec<_> = session.queue().iter().cloned().collect();

    let result = session.upload_batch(&FailingUploader).await;
    assert!(matches!(result, Err(CropError::Upload(_))));

    let after: Vec<_> = session.queue().iter().cloned().collect();
    assert_eq!(after, before);
    assert_eq!(session.take_notices().last().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_successful_upload_clears_queue() {
    let mut session = session_with_queue(2);
    let uploader = RecordingUploader::default();

    assert_eq!(session.upload_batch(&uploader).await.unwrap(), 2);
    assert!(session.queue().is_empty());
    assert_eq!(uploader.received.lock().unwrap().len(), 2);

    // Nothing to send
    assert_eq!(session.upload_batch(&uploader).await.unwrap(), 0);
}

#[test]
fn test_items_queued_during_upload_survive() {
    let mut session = session_with_queue(2);
    let batch = session.batch();
    let ids: Vec<_> = batch.iter().map(|q| q.id).collect();

    drag(&mut session, DisplayRect::new(0.0, 0.0, 50.0, 50.0));
    let late = session.add_to_queue().unwrap();

    session.finish_upload(&ids, Ok(2)).unwrap();
    assert_eq!(session.queue().len(), 1);
    assert!(session.queue().get(late).is_some());
}
