use super::*;

fn fit(total: f64) -> FontFit {
    FontFit {
        font_size_px: total,
        line_height_px: total,
        total_height_px: total,
        line_count: 1,
        widest_line_px: 500.0,
        overflows: false,
    }
}

fn bare() -> TemplateState {
    TemplateState {
        top_title: String::new(),
        main_title: String::new(),
        subtitle1: String::new(),
        subtitle2: String::new(),
        show_logo: false,
        show_subtitle1: false,
        show_subtitle2: false,
        icon_count: 0,
        ..TemplateState::default()
    }
}

fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
    blocks.iter().map(|b| b.kind).collect()
}

#[test]
fn default_state_includes_every_block_in_order() {
    let blocks = build_catalog(&TemplateState::default(), &fit(300.0)).unwrap();
    assert_eq!(kinds(&blocks), BlockKind::ORDER.to_vec());
    assert_eq!(blocks[0].height, 58.0);
    assert!((blocks[1].height - 64.0 * 0.82).abs() < 1e-9);
    assert_eq!(blocks[2].height, 300.0);
    assert!((blocks[3].height - 75.0 * 0.82).abs() < 1e-9);
    assert!((blocks[4].height - 40.0 * 0.82).abs() < 1e-9);
    assert_eq!(blocks[5].height, 57.0);
    for b in &blocks[..5] {
        assert_eq!(b.margin_bottom, BLOCK_MARGIN_PX);
    }
    assert_eq!(blocks[5].margin_bottom, 0.0);
}

#[test]
fn empty_state_gives_empty_catalog() {
    let blocks = build_catalog(&bare(), &FontFit::EMPTY).unwrap();
    assert!(blocks.is_empty());
}

#[test]
fn whitespace_titles_are_excluded() {
    let s = TemplateState {
        top_title: "   ".to_owned(),
        main_title: "\t".to_owned(),
        show_logo: true,
        ..bare()
    };
    let blocks = build_catalog(&s, &FontFit::EMPTY).unwrap();
    assert_eq!(kinds(&blocks), vec![BlockKind::Logo]);
    assert_eq!(blocks[0].margin_bottom, 0.0);
}

#[test]
fn subtitles_need_both_toggle_and_text() {
    let s = TemplateState {
        subtitle1: "Shown".to_owned(),
        show_subtitle1: true,
        subtitle2: "Hidden".to_owned(),
        show_subtitle2: false,
        ..bare()
    };
    let blocks = build_catalog(&s, &FontFit::EMPTY).unwrap();
    assert_eq!(kinds(&blocks), vec![BlockKind::Subtitle1]);

    let s = TemplateState {
        show_subtitle1: true,
        ..bare()
    };
    assert!(build_catalog(&s, &FontFit::EMPTY).unwrap().is_empty());
}

#[test]
fn logo_and_main_title_scenario() {
    let s = TemplateState {
        show_logo: true,
        main_title: "THIS IS MAIN TITLE".to_owned(),
        ..bare()
    };
    let blocks = build_catalog(&s, &fit(316.8)).unwrap();
    assert_eq!(
        blocks,
        vec![
            Block {
                kind: BlockKind::Logo,
                height: 58.0,
                margin_bottom: 26.0
            },
            Block {
                kind: BlockKind::MainTitle,
                height: 316.8,
                margin_bottom: 0.0
            },
        ]
    );
}

#[test]
fn negative_icon_count_fails() {
    let s = TemplateState {
        icon_count: -3,
        ..bare()
    };
    let err = build_catalog(&s, &FontFit::EMPTY).unwrap_err();
    assert!(matches!(err, crate::TitlecardError::InvalidArgument(_)));
}

#[test]
fn kind_metadata() {
    assert_eq!(BlockKind::MainTitle.nominal_height(), None);
    assert!(BlockKind::Subtitle2.is_text());
    assert!(!BlockKind::Icons.is_text());
    assert_eq!(BlockKind::Subtitle1.to_string(), "subtitle1");
    assert_eq!(
        serde_json::to_string(&BlockKind::TopTitle).unwrap(),
        "\"topTitle\""
    );
}
