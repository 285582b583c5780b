use super::*;
use crate::{
    encode::sink::InMemorySink,
    foundation::error::TitlecardResult,
    render::cpu::CpuBackend,
    state::template::IconStyle,
    text::{
        measure::{FontWeight, HeuristicMeasurer},
        shaper::FontSet,
    },
};

/// Heuristic measurement, records plans and returns blank frames.
#[derive(Default)]
struct RecordingBackend {
    measurer: HeuristicMeasurer,
    plans: Vec<FramePlan>,
}

impl TextMeasurer for RecordingBackend {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        self.measurer.measure_width(text, weight, size_px)
    }
}

impl RenderBackend for RecordingBackend {
    fn render_plan(&mut self, plan: &FramePlan) -> TitlecardResult<FrameRGBA> {
        self.plans.push(plan.clone());
        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: vec![0; plan.canvas.width as usize * plan.canvas.height as usize * 4],
            premultiplied: true,
        })
    }
}

fn small_project() -> Project {
    Project {
        export: ExportSettings {
            fps: 10,
            duration_s: 0.5,
            width: 64,
            height: 36,
            overwrite: true,
        },
        ..Project::default()
    }
}

#[test]
fn export_defaults() {
    let s = ExportSettings::default();
    assert_eq!((s.fps, s.width, s.height), (60, 1920, 1080));
    assert_eq!(s.duration_s, 5.0);
    assert_eq!(s.frame_count().unwrap(), 300);
}

#[test]
fn invalid_export_settings_are_rejected() {
    let mut s = ExportSettings::default();
    s.duration_s = 0.0;
    assert!(s.validate().is_err());
    let mut s = ExportSettings::default();
    s.width = 0;
    assert!(s.validate().is_err());
    let mut s = ExportSettings::default();
    s.fps = 0;
    assert!(s.validate().is_err());
}

#[test]
fn video_streams_every_frame_with_one_layout() {
    let project = small_project();
    let mut session = RenderSession::new(&project, RecordingBackend::default()).unwrap();
    let layout_before = session.layout().clone();

    let mut sink = InMemorySink::new();
    let stats = session.render_to_sink(&mut sink).unwrap();
    assert_eq!(stats.frames_total, 5);
    assert_eq!(stats.frames_rendered, 5);
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    assert_eq!(sink.config().unwrap().fps, Fps::new(10, 1).unwrap());

    assert_eq!(session.layout(), &layout_before);
    let backend = session.into_backend();
    assert_eq!(backend.plans.len(), 5);
    // Frame 0 is background only; later frames reveal the first block.
    assert_eq!(backend.plans[0].ops.len(), 1);
    assert!(backend.plans[4].ops.len() > 1);
}

#[test]
fn final_plan_shows_everything() {
    let project = Project::default();
    let session = RenderSession::new(&project, RecordingBackend::default()).unwrap();
    let settled = session.final_plan();
    let late = session.plan_at(session.timeline().duration() + 1.0);
    assert_eq!(settled, late);
    assert_eq!(settled.texts().count(), 6);
}

#[test]
fn invalid_project_fails_session() {
    let mut project = small_project();
    project.state.icon_count = -2;
    let err = RenderSession::new(&project, RecordingBackend::default())
        .err()
        .unwrap();
    assert!(matches!(err, TitlecardError::InvalidArgument(_)));
}

#[test]
fn non_finite_time_is_rejected() {
    let project = small_project();
    let mut session = RenderSession::new(&project, RecordingBackend::default()).unwrap();
    assert!(session.render_at(f64::NAN).is_err());
}

#[test]
fn text_without_fonts_defers() {
    let project = small_project();
    let backend = CpuBackend::new(&FontSet::new()).unwrap();
    let err = RenderSession::new(&project, backend).err().unwrap();
    assert!(err.is_deferrable());
}

#[test]
fn still_of_icon_only_card_is_written() {
    let mut project = small_project();
    project.export.width = 200;
    project.export.height = 100;
    project.state = TemplateState {
        top_title: String::new(),
        main_title: String::new(),
        show_logo: false,
        show_subtitle1: false,
        show_subtitle2: false,
        icon_count: 1,
        icon_style: IconStyle::Dot,
        ..TemplateState::default()
    };
    let out = std::path::PathBuf::from("target/titlecard-tests/still_icon.png");
    let backend = CpuBackend::new(&FontSet::new()).unwrap();
    export_still(&project, backend, 10.0, &out).unwrap();

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (200, 100));
    assert_eq!(img.get_pixel(100, 50).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(3, 3).0, [0, 0, 0, 255]);
}

#[test]
fn still_respects_overwrite_flag() {
    let out = std::path::PathBuf::from("target/titlecard-tests/existing.png");
    std::fs::create_dir_all("target/titlecard-tests").unwrap();
    std::fs::write(&out, b"x").unwrap();
    let mut project = small_project();
    project.export.overwrite = false;
    let err = export_still(&project, RecordingBackend::default(), 0.0, &out).unwrap_err();
    assert!(matches!(err, TitlecardError::Export(_)));
}

#[test]
fn video_refuses_existing_file_before_rendering() {
    let out = std::path::PathBuf::from("target/titlecard-tests/existing.mp4");
    std::fs::create_dir_all("target/titlecard-tests").unwrap();
    std::fs::write(&out, b"x").unwrap();
    let mut project = small_project();
    project.export.overwrite = false;
    let err = export_video(&project, RecordingBackend::default(), &out).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read(&out).unwrap(), b"x");
}

#[test]
fn output_directories_are_created() {
    let dir = std::path::PathBuf::from("target/titlecard-tests/nested/out");
    let _ = std::fs::remove_dir_all(&dir);
    prepare_output(&dir.join("card.png"), false).unwrap();
    assert!(dir.is_dir());
    prepare_output(std::path::Path::new("bare.png"), true).unwrap();
}
