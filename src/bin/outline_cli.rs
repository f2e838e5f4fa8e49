#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("outline_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use outline_engine::geom::{Point2, Polygon, TangentStrategy};
    use outline_engine::outline::{
        AnalysisDiagnostics, Calibration, DescriptorMethod, MeasurementSummary,
        OutlineMeasurement, OutlineSettings, csv_header, csv_row,
    };
    use std::f64::consts::TAU;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"outline_cli (outline-engine)

USAGE:
  outline_cli list
  outline_cli run <scenario|all> [options]

SCENARIOS:
  circle_radius
  ellipse_radius
  square_radius
  ellipse_tangent
  crescent_failure

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.snap to this dir (required for `all`)
  --snap <path>      Write snapshot (single scenario only)
  --csv              Print the CSV header and row instead of the snapshot
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut csv_only = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--csv" => csv_only = true,
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if snap_path.is_some() {
                return Err("use either --out-dir or --snap (not both)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario = Scenario::from_str(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if csv_only {
            println!("{}", output.csv_header);
            println!("{}", output.csv_row);
        } else if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        eprintln!("{}: {}", output.name, output.status);
        Ok(())
    }

    fn run_one_scenario_to_dir(scenario: Scenario, dir: &Path, overwrite: bool) -> Result<(), String> {
        let output = run_scenario(scenario)?;
        let path = dir.join(format!("{}.snap", output.name));
        write_text_file(&path, &output.snapshot, overwrite)?;
        eprintln!("wrote {}", path.display());
        eprintln!("{}: {}", output.name, output.status);
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "unknown scenario `{name}`\n\navailable scenarios:");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_point_line(out: &mut String, prefix: &str, p: Point2) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, p.x);
        out.push(' ');
        write_f64(out, p.y);
        out.push('\n');
    }

    fn write_scalar_line(out: &mut String, prefix: &str, value: f64) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, value);
        out.push('\n');
    }

    fn write_polygon(out: &mut String, label: &str, polygon: &Polygon) {
        let _ = writeln!(out, "{label}.point_count {}", polygon.len());
        write_scalar_line(out, &format!("{label}.area"), polygon.area());
        write_scalar_line(out, &format!("{label}.perimeter"), polygon.perimeter());
        if let Some(c) = polygon.centroid() {
            write_point_line(out, &format!("{label}.centroid"), c);
        }
        for (idx, p) in polygon.points().iter().copied().enumerate() {
            write_point_line(out, &format!("{label}.p.{idx}"), p);
        }
    }

    fn write_analysis_diagnostics(out: &mut String, diag: &AnalysisDiagnostics) {
        if let Some(iterations) = diag.spline_solver_iterations {
            let _ = writeln!(out, "diag.spline_solver_iterations {iterations}");
        }
        if let Some(iterations) = diag.closure_iterations {
            let _ = writeln!(out, "diag.closure_iterations {iterations}");
        }
        let _ = writeln!(out, "diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "diag.warning.{idx} {warning}");
        }
        let _ = writeln!(out, "diag.failure_count {}", diag.failures.len());
        for (idx, (stage, message)) in diag.failures.iter().enumerate() {
            let _ = writeln!(out, "diag.failure.{idx} {} {message}", stage.label());
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# outline-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        CircleRadius,
        EllipseRadius,
        SquareRadius,
        EllipseTangent,
        CrescentFailure,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::CircleRadius,
            Scenario::EllipseRadius,
            Scenario::SquareRadius,
            Scenario::EllipseTangent,
            Scenario::CrescentFailure,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::CircleRadius => "circle_radius",
                Scenario::EllipseRadius => "ellipse_radius",
                Scenario::SquareRadius => "square_radius",
                Scenario::EllipseTangent => "ellipse_tangent",
                Scenario::CrescentFailure => "crescent_failure",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            match name {
                "circle_radius" => Some(Scenario::CircleRadius),
                "ellipse_radius" => Some(Scenario::EllipseRadius),
                "square_radius" => Some(Scenario::SquareRadius),
                "ellipse_tangent" => Some(Scenario::EllipseTangent),
                "crescent_failure" => Some(Scenario::CrescentFailure),
                _ => None,
            }
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        status: String,
        csv_header: String,
        csv_row: String,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        match scenario {
            Scenario::CircleRadius => measure_scenario(
                scenario,
                ellipse(16, Point2::new(50.0, 40.0), 20.0, 20.0),
                DescriptorMethod::RadiusVsAngle,
                TangentStrategy::CirclePreserving,
            ),
            Scenario::EllipseRadius => measure_scenario(
                scenario,
                ellipse(24, Point2::new(0.0, 0.0), 30.0, 15.0),
                DescriptorMethod::RadiusVsAngle,
                TangentStrategy::CirclePreserving,
            ),
            Scenario::SquareRadius => measure_scenario(
                scenario,
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(10.0, 0.0),
                    Point2::new(10.0, 10.0),
                    Point2::new(0.0, 10.0),
                ],
                DescriptorMethod::RadiusVsAngle,
                TangentStrategy::Chord,
            ),
            Scenario::EllipseTangent => measure_scenario(
                scenario,
                ellipse(24, Point2::new(5.0, -5.0), 30.0, 15.0),
                DescriptorMethod::TangentVsArclength,
                TangentStrategy::CirclePreserving,
            ),
            Scenario::CrescentFailure => measure_scenario(
                scenario,
                crescent(),
                DescriptorMethod::RadiusVsAngle,
                TangentStrategy::CirclePreserving,
            ),
        }
    }

    fn measure_scenario(
        scenario: Scenario,
        knots: Vec<Point2>,
        method: DescriptorMethod,
        strategy: TangentStrategy,
    ) -> Result<ScenarioOutput, String> {
        let settings = OutlineSettings::new(6, 8, 0, method, strategy).map_err(|e| e.to_string())?;
        let mut measurement = OutlineMeasurement::with_settings(settings);
        measurement.set_knots(knots, true);
        let calibration = Calibration::pixels();

        let summary = MeasurementSummary::build(&mut measurement, &calibration);
        let header = csv_header(scenario.name(), measurement.settings());
        let row = csv_row(&mut measurement, &calibration);
        let reconstruction = measurement.reconstruction().ok().cloned();
        let status = match measurement.diagnostics().failures.first() {
            Some((stage, message)) => format!("{} failed | {message}", stage.label()),
            None => format!("measured | {}", settings.method().label()),
        };

        let snap = snapshot(scenario.name(), |out| {
            let _ = writeln!(out, "method {}", settings.method().label());
            let _ = writeln!(out, "strategy {}", settings.strategy().label());
            let _ = writeln!(out, "csv.header {header}");
            let _ = writeln!(out, "csv.field_count {}", row.split(',').count());
            write_analysis_diagnostics(out, measurement.diagnostics());
            if let MeasurementSummary::Measured(figures) = &summary {
                write_scalar_line(out, "summary.area", figures.area);
                write_scalar_line(out, "summary.perimeter", figures.perimeter);
                if let Some(c) = figures.centroid {
                    write_point_line(out, "summary.centroid", c);
                }
                let _ = writeln!(out, "summary.orientation {}", figures.orientation.label());
                for (harmonic, amplitude) in figures.amplitudes.iter().flatten() {
                    write_scalar_line(out, &format!("summary.amplitude.{harmonic}"), *amplitude);
                }
            }
            match reconstruction.as_ref() {
                Some(polygon) => write_polygon(out, "reconstruction", polygon),
                None => {
                    let _ = writeln!(out, "reconstruction none");
                }
            }
        });

        Ok(ScenarioOutput {
            name: scenario.name(),
            status,
            csv_header: header,
            csv_row: row,
            snapshot: snap,
        })
    }

    fn ellipse(n: usize, center: Point2, a: f64, b: f64) -> Vec<Point2> {
        (0..n)
            .map(|j| {
                let t = TAU * j as f64 / n as f64;
                Point2::new(center.x + a * t.cos(), center.y + b * t.sin())
            })
            .collect()
    }

    fn crescent() -> Vec<Point2> {
        let limit = 150f64.to_radians();
        let steps = 12;
        let arc = |radius: f64, j: usize| {
            let t = -limit + 2.0 * limit * j as f64 / (steps - 1) as f64;
            Point2::new(radius * t.cos(), radius * t.sin())
        };
        let mut knots: Vec<Point2> = (0..steps).map(|j| arc(10.0, j)).collect();
        knots.extend((0..steps).rev().map(|j| arc(8.0, j)));
        knots
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
