//! Textual chart format.
//!
//! A chart is written as an optional `Key:Value` header terminated by a `-` line, followed by one
//! statement per line. Scoped blocks are written as `timinggroup(attrs){ ... };` with attributes
//! joined by `_`.

use std::fmt::Write as _;

use crate::{
    chart::model::{ArcColor, ArcCurve, ArcNote, Chart, ChartConfig, Note, TimingGroup},
    foundation::core::Position,
    foundation::error::{ShardError, ShardResult},
};

const AUDIO_OFFSET_KEY: &str = "AudioOffset";

/// Serialize a chart to its textual form.
pub fn serialize(chart: &Chart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{AUDIO_OFFSET_KEY}:{}", chart.config.audio_offset);
    for (k, v) in &chart.config.extra {
        let _ = writeln!(out, "{k}:{v}");
    }
    out.push_str("-\n");

    write_group_body(&mut out, &chart.main, "");
    for group in &chart.groups {
        let _ = writeln!(out, "timinggroup({}){{", group.attrs.join("_"));
        write_group_body(&mut out, group, "  ");
        out.push_str("};\n");
    }
    out
}

fn write_group_body(out: &mut String, group: &TimingGroup, indent: &str) {
    for t in &group.timings {
        let _ = writeln!(
            out,
            "{indent}timing({},{:.2},{:.2});",
            t.offset, t.bpm, t.beats
        );
    }
    for note in &group.notes {
        out.push_str(indent);
        write_note(out, note);
        out.push('\n');
    }
}

fn write_note(out: &mut String, note: &Note) {
    match note {
        Note::Tap { time, lane } => {
            let _ = write!(out, "({time},{lane});");
        }
        Note::Hold {
            time,
            end_time,
            lane,
        } => {
            let _ = write!(out, "hold({time},{end_time},{lane});");
        }
        Note::Arc(arc) => {
            let _ = write!(
                out,
                "arc({},{},{:.2},{:.2},{},{:.2},{:.2},{},{},{})",
                arc.time,
                arc.end_time,
                arc.start.x,
                arc.end.x,
                arc.curve.tag(),
                arc.start.y,
                arc.end.y,
                arc.color.0,
                arc.hit_sound,
                arc.trace
            );
            if !arc.arctaps.is_empty() {
                let taps: Vec<String> = arc.arctaps.iter().map(|t| format!("arctap({t})")).collect();
                let _ = write!(out, "[{}]", taps.join(","));
            }
            out.push(';');
        }
    }
}

/// Parse a textual chart.
///
/// Statements this crate does not model (scene controls, camera moves) are skipped.
pub fn parse(text: &str) -> ShardResult<Chart> {
    let mut chart = Chart::new(ChartConfig::default());
    let mut in_header = true;
    let mut open: Option<TimingGroup> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if in_header {
            if line == "-" {
                in_header = false;
                continue;
            }
            if let Some((k, v)) = line.split_once(':')
                && !line.contains('(')
            {
                if k == AUDIO_OFFSET_KEY {
                    chart.config.audio_offset = v
                        .trim()
                        .parse()
                        .map_err(|_| parse_err(line_no, "AudioOffset must be an integer"))?;
                } else {
                    chart
                        .config
                        .extra
                        .push((k.trim().to_string(), v.trim().to_string()));
                }
                continue;
            }
            in_header = false;
        }

        if let Some(rest) = line.strip_prefix("timinggroup(") {
            if open.is_some() {
                return Err(parse_err(line_no, "nested timinggroup"));
            }
            let attrs = rest
                .strip_suffix("){")
                .ok_or_else(|| parse_err(line_no, "timinggroup must end with `){`"))?;
            open = Some(TimingGroup::with_attrs(
                attrs.split('_').filter(|a| !a.is_empty()),
            ));
            continue;
        }

        if line == "};" || line == "}" {
            let group = open
                .take()
                .ok_or_else(|| parse_err(line_no, "unmatched `}`"))?;
            chart.commit_group(group);
            continue;
        }

        let target = open.as_mut().unwrap_or(&mut chart.main);
        parse_statement(line, line_no, target)?;
    }

    if open.is_some() {
        return Err(ShardError::serde("chart ends inside a timinggroup"));
    }
    Ok(chart)
}

fn parse_statement(line: &str, line_no: usize, target: &mut TimingGroup) -> ShardResult<()> {
    let body = line
        .strip_suffix(';')
        .ok_or_else(|| parse_err(line_no, "statement must end with `;`"))?;
    let open = body
        .find('(')
        .ok_or_else(|| parse_err(line_no, "expected `(`"))?;
    let name = &body[..open];
    let (args, subs) = match body.find(')') {
        Some(close) if close > open => (&body[open + 1..close], &body[close + 1..]),
        _ => return Err(parse_err(line_no, "expected `)`")),
    };
    let args: Vec<&str> = args.split(',').map(str::trim).collect();

    match name {
        "" => {
            expect_arity(&args, 2, line_no)?;
            target.add_note(Note::Tap {
                time: int(args[0], line_no)?,
                lane: int(args[1], line_no)?,
            });
        }
        "hold" => {
            expect_arity(&args, 3, line_no)?;
            target.add_note(Note::Hold {
                time: int(args[0], line_no)?,
                end_time: int(args[1], line_no)?,
                lane: int(args[2], line_no)?,
            });
        }
        "timing" => {
            expect_arity(&args, 3, line_no)?;
            target.timing(
                int(args[0], line_no)?,
                float(args[1], line_no)?,
                float(args[2], line_no)?,
            );
        }
        "arc" => {
            expect_arity(&args, 10, line_no)?;
            let curve = ArcCurve::from_tag(args[4])
                .ok_or_else(|| parse_err(line_no, format!("unknown arc curve `{}`", args[4])))?;
            let trace = match args[9] {
                "true" => true,
                "false" => false,
                other => {
                    return Err(parse_err(
                        line_no,
                        format!("arc trace flag must be a boolean, got `{other}`"),
                    ));
                }
            };
            let mut arc = ArcNote::new(
                int(args[0], line_no)?,
                int(args[1], line_no)?,
                Position::new(float(args[2], line_no)?, float(args[5], line_no)?),
                curve,
                Position::new(float(args[3], line_no)?, float(args[6], line_no)?),
                ArcColor(int(args[7], line_no)?),
                trace,
            );
            arc.hit_sound = args[8].to_string();
            arc.arctaps = parse_arctaps(subs, line_no)?;
            target.add_note(Note::Arc(arc));
        }
        other => {
            tracing::debug!(line = line_no, statement = other, "skipping unmodelled statement");
        }
    }
    Ok(())
}

fn parse_arctaps(subs: &str, line_no: usize) -> ShardResult<Vec<i64>> {
    let subs = subs.trim();
    if subs.is_empty() {
        return Ok(Vec::new());
    }
    let inner = subs
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| parse_err(line_no, "arctap list must be wrapped in `[]`"))?;
    inner
        .split(',')
        .map(|tap| {
            let t = tap
                .trim()
                .strip_prefix("arctap(")
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| parse_err(line_no, format!("malformed arctap `{tap}`")))?;
            int(t, line_no)
        })
        .collect()
}

fn expect_arity(args: &[&str], n: usize, line_no: usize) -> ShardResult<()> {
    if args.len() != n {
        return Err(parse_err(
            line_no,
            format!("expected {n} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

fn int<T: std::str::FromStr>(s: &str, line_no: usize) -> ShardResult<T> {
    s.parse()
        .map_err(|_| parse_err(line_no, format!("`{s}` is not an integer")))
}

fn float(s: &str, line_no: usize) -> ShardResult<f64> {
    s.parse()
        .map_err(|_| parse_err(line_no, format!("`{s}` is not a number")))
}

fn parse_err(line_no: usize, msg: impl std::fmt::Display) -> ShardError {
    ShardError::serde(format!("chart line {line_no}: {msg}"))
}

#[cfg(test)]
#[path = "../../tests/unit/chart/aff.rs"]
mod tests;
