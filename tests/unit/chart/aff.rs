use super::*;

const SAMPLE: &str = r#"
scenecontrol(19045,trackhide);
(1,2);
arc(19045,19045,0.00,1.00,s,1.00,1.00,3,none,false);
arc(17140,19045,0.00,1.00,s,1.00,1.00,3,none,false)[arctap(17140),arctap(19045)];
timinggroup(fadingholds_anglex3600){
    timing(0,126.00,4.00);
    hold(17140,18807,4);
    arc(17140,18569,0.00,0.50,siso,1.00,0.00,0,none,true)[arctap(18569)];
};
"#;

#[test]
fn parses_headerless_chart() {
    let chart = parse(SAMPLE).unwrap();
    assert_eq!(chart.config.audio_offset, 0);
    assert_eq!(chart.main.notes.len(), 3);
    assert_eq!(chart.groups.len(), 1);

    let group = &chart.groups[0];
    assert_eq!(group.attrs, vec!["fadingholds", "anglex3600"]);
    assert_eq!(group.timings.len(), 1);
    assert_eq!(group.notes.len(), 2);

    match &chart.main.notes[2] {
        Note::Arc(arc) => {
            assert_eq!(arc.arctaps, vec![17140, 19045]);
            assert_eq!(arc.color, ArcColor(3));
            assert_eq!(arc.start, Position::new(0.0, 1.0));
            assert_eq!(arc.end, Position::new(1.0, 1.0));
        }
        other => panic!("expected arc, got {other:?}"),
    }
}

#[test]
fn serialized_chart_parses_back() {
    let mut chart = Chart::new(ChartConfig::with_audio_offset(-660));
    chart.config.extra.push(("TimingPointDensityFactor".into(), "1".into()));
    chart.timing(0, 126.0, 4.0);
    chart.add_note(Note::Tap { time: 100, lane: 2 });
    chart.timing_group([crate::chart::model::NO_INPUT], |g| {
        g.timing(0, 60.0, 999.0);
        g.timing(99, -15616740.0, 999.0);
        g.add_note(Note::Arc(ArcNote::quick_arctap(
            444,
            Position::new(0.25, 0.0),
        )));
    });

    let text = serialize(&chart);
    assert!(text.starts_with("AudioOffset:-660\nTimingPointDensityFactor:1\n-\n"));
    assert!(text.contains("timinggroup(noinput){"));
    assert!(text.contains("arc(443,444,0.25,0.25,s,0.00,0.00,0,none,true)[arctap(444)];"));

    let back = parse(&text).unwrap();
    assert_eq!(back, chart);
}

#[test]
fn malformed_lines_report_line_numbers() {
    let err = parse("AudioOffset:0\n-\nhold(1,2);\n").unwrap_err();
    assert!(err.to_string().contains("chart line 3"));

    let err = parse("timinggroup(noinput){\n(1,2);\n").unwrap_err();
    assert!(matches!(err, ShardError::Serde(_)));

    let err = parse("};\n").unwrap_err();
    assert!(err.to_string().contains("unmatched"));
}
