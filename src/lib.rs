#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod numeric;
pub mod outline;
pub mod parse;

use std::fmt;

use geom::{Point2, TangentStrategy};
use outline::{
    Calibration, ConfigError, DescriptorMethod, MeasurementSummary, OutlineMeasurement, OutlineSet,
};
use parse::session_xml::{self, OutlineSession};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

const DEFAULT_NAME: &str = "outline";

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    name: String,
    measurement: OutlineMeasurement,
    calibration: Calibration,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            name: DEFAULT_NAME.to_owned(),
            measurement: OutlineMeasurement::new(),
            calibration: Calibration::default(),
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Naam van de meting, gebruikt in de CSV-kop en de sessie.
    #[wasm_bindgen]
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_NAME.to_owned()
        } else {
            trimmed.to_owned()
        };
    }

    /// Vervang de gedigitaliseerde punten door een platte `[x0, y0, x1, y1, ...]` lijst.
    #[wasm_bindgen]
    pub fn set_points(&mut self, coordinates: &[f64], closed: bool) -> Result<(), JsValue> {
        let points = points_from_flat(coordinates).map_err(|err| js_error(&err))?;
        debug_log!("set_points: {} punten, gesloten={closed}", points.len());
        self.measurement.set_knots(points, closed);
        Ok(())
    }

    /// Stel de resampling-macht `p` in (`2^p` punten).
    #[wasm_bindgen]
    pub fn set_resampling_power(&mut self, power: u32) -> Result<(), JsValue> {
        self.measurement
            .set_resampling_power(power)
            .map_err(to_js_error)
    }

    /// Stel de hoogste bewaarde Fourier-coëfficiënt in.
    #[wasm_bindgen]
    pub fn set_highest_coefficient(&mut self, value: u32) -> Result<(), JsValue> {
        self.measurement
            .set_highest_coefficient(value as usize)
            .map_err(to_js_error)
    }

    /// Stel de normalisatie-index in (0 schakelt normalisatie uit).
    #[wasm_bindgen]
    pub fn set_normalization_index(&mut self, value: u32) -> Result<(), JsValue> {
        self.measurement
            .set_normalization_index(value as usize)
            .map_err(to_js_error)
    }

    /// Kies de Fourier-methode: `none`, `radius-vs-angle` of `tangent-vs-arclength`.
    #[wasm_bindgen]
    pub fn set_method(&mut self, label: &str) -> Result<(), JsValue> {
        let method = DescriptorMethod::parse(label).map_err(to_js_error)?;
        self.measurement.set_method(method);
        Ok(())
    }

    /// Kies de spline-strategie: `chord` of `circle-preserving`.
    #[wasm_bindgen]
    pub fn set_strategy(&mut self, label: &str) -> Result<(), JsValue> {
        let strategy = TangentStrategy::from_label(label)
            .ok_or_else(|| to_js_error(ConfigError::UnknownStrategy(label.to_owned())))?;
        self.measurement.set_strategy(strategy);
        Ok(())
    }

    /// Stel de kalibratiefactor (eenheden per pixel) in; `undefined` wist de factor.
    /// Een eerder ingestelde oorsprong blijft behouden.
    #[wasm_bindgen]
    pub fn set_calibration(&mut self, factor: Option<f64>) -> Result<(), JsValue> {
        let mut calibration = match factor {
            Some(factor) => Calibration::with_factor(factor).map_err(to_js_error)?,
            None => Calibration::default(),
        };
        if let Some(origin) = self.calibration.origin() {
            calibration = calibration.with_origin(origin).map_err(to_js_error)?;
        }
        self.calibration = calibration;
        Ok(())
    }

    /// Stel de oorsprong van het monster in pixelcoördinaten in. Zonder
    /// oorsprong wordt het zwaartepunt niet gerapporteerd.
    #[wasm_bindgen]
    pub fn set_calibration_origin(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.calibration = self
            .calibration
            .with_origin(Point2::new(x, y))
            .map_err(to_js_error)?;
        Ok(())
    }

    /// Verwijder de oorsprong; oppervlakte en omtrek blijven gekalibreerd.
    #[wasm_bindgen]
    pub fn clear_calibration_origin(&mut self) {
        self.calibration = self.calibration.without_origin();
    }

    /// Tekstuele samenvatting: oppervlakte, zwaartepunt, omtrek, oriëntatie en amplitudes.
    #[wasm_bindgen]
    pub fn summary(&mut self) -> String {
        MeasurementSummary::build(&mut self.measurement, &self.calibration).to_string()
    }

    /// CSV-kop voor de huidige instellingen.
    #[wasm_bindgen]
    pub fn csv_header(&self) -> String {
        outline::csv_header(&self.name, self.measurement.settings())
    }

    /// CSV-rij die past bij [`Engine::csv_header`].
    #[wasm_bindgen]
    pub fn csv_row(&mut self) -> String {
        outline::csv_row(&mut self.measurement, &self.calibration)
    }

    /// Diagnostiek van de laatste berekeningen.
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> String {
        let stats = self.measurement.cache_stats();
        format!(
            "{}  Cache hit rate: {:.2}\n",
            self.measurement.diagnostics(),
            stats.hit_rate()
        )
    }

    /// Haal de knopen, geïnterpoleerde, geresamplede en gereconstrueerde outlines op.
    #[wasm_bindgen]
    pub fn outlines(&mut self) -> Result<JsValue, JsValue> {
        let set = OutlineSet::collect(&mut self.measurement);
        serde_wasm_bindgen::to_value(&set).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Laad een sessie en vervang punten, instellingen en kalibratie.
    #[wasm_bindgen]
    pub fn load_session(&mut self, xml: &str) -> Result<(), JsValue> {
        let session = session_xml::parse_str(xml).map_err(to_js_error)?;
        let (measurement, calibration) = session.restore().map_err(to_js_error)?;
        debug_log!(
            "sessie '{}' geladen met {} punten",
            session.name,
            measurement.knots().len()
        );

        if !session.name.trim().is_empty() {
            self.name = session.name;
        }
        self.measurement = measurement;
        self.calibration = calibration;
        Ok(())
    }

    /// Schrijf de huidige invoer als sessie-XML.
    #[wasm_bindgen]
    pub fn save_session(&self) -> Result<String, JsValue> {
        let session = OutlineSession::capture(&*self.name, &self.measurement, &self.calibration);
        session_xml::to_xml_string(&session).map_err(to_js_error)
    }
}

impl Engine {
    /// Toegang tot de onderliggende meting.
    #[must_use]
    pub fn measurement(&self) -> &OutlineMeasurement {
        &self.measurement
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}

fn points_from_flat(coordinates: &[f64]) -> Result<Vec<Point2>, String> {
    if coordinates.len() % 2 != 0 {
        return Err(format!(
            "verwacht een even aantal coördinaten, kreeg {}",
            coordinates.len()
        ));
    }
    if let Some(index) = coordinates.iter().position(|v| !v.is_finite()) {
        return Err(format!("coördinaat {index} is geen eindig getal"));
    }
    Ok(coordinates
        .chunks_exact(2)
        .map(|pair| Point2::new(pair[0], pair[1]))
        .collect())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
