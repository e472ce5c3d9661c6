// Editor and viewer flows driven through the public API, from screen-space pointer
// positions down to coordinate strings and hit regions.

use std::io::Write as _;

use region_annotator::authoring::ShapeAuthor;
use region_annotator::coords::ShapeKind;
use region_annotator::geometry::Point;
use region_annotator::jobs::JobError;
use region_annotator::mapper::ScreenTransform;
use region_annotator::regions::{DetailView, RegionCatalog, RegionViewer};

/// Image of 600x300 shown at half size, offset by (40, 60) on screen.
fn half_size_display() -> ScreenTransform {
    ScreenTransform::fit(Point::new(40.0, 60.0), [300.0, 150.0], [600, 300])
}

#[test]
fn test_rectangle_drag_through_scaled_display() {
    let t = half_size_display();
    let mut author = ShapeAuthor::new(ShapeKind::Rect);
    author.set_image_loaded(true);

    let down = t.to_screen(Point::new(200.0, 100.0));
    let up = t.to_screen(Point::new(250.0, 140.0));
    author.pointer_down(t.to_image_pixel(down));
    author.pointer_move(t.to_image_pixel(Point::new(up.x - 5.0, up.y)));
    author.pointer_move(t.to_image_pixel(up));
    author.pointer_up(t.to_image_pixel(up));

    assert_eq!(author.output(), "200,100,250,140");
}

#[test]
fn test_rectangle_dragged_backwards_keeps_min_corner_first() {
    let t = half_size_display();
    let mut author = ShapeAuthor::new(ShapeKind::Rect);
    author.set_image_loaded(true);

    author.pointer_down(t.to_image_pixel(t.to_screen(Point::new(250.0, 140.0))));
    author.pointer_up(t.to_image_pixel(t.to_screen(Point::new(200.0, 100.0))));

    let nums: Vec<i64> = author
        .output()
        .split(',')
        .map(|n| n.parse().unwrap())
        .collect();
    assert!(nums[0] <= nums[2] && nums[1] <= nums[3]);
}

#[test]
fn test_polygon_then_mode_switch() {
    let t = ScreenTransform::IDENTITY;
    let mut author = ShapeAuthor::new(ShapeKind::Polygon);
    author.set_image_loaded(true);

    for (x, y) in [(10.0, 10.0), (40.0, 10.0), (25.0, 30.0)] {
        author.click(t.to_image_pixel(Point::new(x, y)));
    }
    assert!(author.finish());
    assert_eq!(author.output(), "10,10 40,10 25,30");

    author.set_mode(ShapeKind::Rect);
    assert_eq!(author.output(), "");
    assert!(author.shape().is_none());
    assert!(!author.finish_enabled());
}

#[test]
fn test_viewer_click_above_window_shows_placeholder() {
    let t = half_size_display();
    let mut viewer = RegionViewer::new(RegionCatalog::default(), false);
    viewer.initialize([600, 300]);

    // Select something first so the miss has a highlight to clear.
    viewer.click(t.to_image(t.to_screen(Point::new(220.0, 120.0))));
    assert_eq!(viewer.highlighted(), Some(0));

    let screen = t.to_screen(Point::new(205.0, 105.0));
    assert!(viewer.click(t.to_image(screen)).is_none());
    assert_eq!(viewer.detail(), DetailView::Placeholder);
    assert_eq!(viewer.highlighted(), None);
}

#[test]
fn test_catalog_file_with_job_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coach.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{
            "image": "coach.png",
            "regions": [
                {{"id": "door", "name": "Door", "shape": "polygon",
                  "coords": "10,10 40,10 40,60 10,60", "hours": 2.5, "price": 310,
                  "components": ["Hinge", "Handle"]}},
                {{"id": "lamp", "name": "Lamp", "shape": "circle", "coords": "80,20,6",
                  "price": 45.5}}
            ]
        }}"#
    )
    .unwrap();

    let catalog = RegionCatalog::from_path(&path).unwrap();
    let mut viewer = RegionViewer::new(catalog, true);
    viewer.initialize([100, 100]);

    viewer.click(Point::new(20.0, 30.0));
    viewer.add_selected_job().unwrap();
    assert!(matches!(
        viewer.add_selected_job(),
        Err(JobError::Duplicate { ref id, .. }) if id == "door"
    ));
    viewer.dismiss_notice();

    viewer.click(Point::new(82.0, 21.0));
    viewer.add_selected_job().unwrap();

    let jobs = viewer.jobs().unwrap();
    let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["Door", "Lamp"]);
    assert_eq!(jobs.total_hours(), 2.5);
    assert_eq!(jobs.total_price(), 355.5);

    viewer.cancel_job("door");
    viewer.cancel_job("door");
    assert_eq!(viewer.jobs().map(|j| j.len()), Some(1));
}

#[test]
fn test_missing_catalog_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = RegionCatalog::from_path(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, region_annotator::AnnotatorError::Io(_)));
}
