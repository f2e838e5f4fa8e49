//! Lezen en schrijven van een outline-sessie als XML.
//!
//! Een sessie bevat de ruwe punten, de gesloten-vlag en de scalaire
//! instellingen van één meting. Afgeleide waarden worden niet opgeslagen;
//! ze worden na het laden deterministisch opnieuw berekend.
//!
//! ```xml
//! <outline name="shell" closed="true">
//!   <settings power="6" highest="10" normalization="0" method="radius-vs-angle" strategy="circle-preserving"/>
//!   <calibration factor="0.25" origin-x="12" origin-y="40"/>
//!   <point x="10" y="20"/>
//! </outline>
//! ```

use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{Point2, TangentStrategy};
use crate::outline::{Calibration, ConfigError, DescriptorMethod, OutlineMeasurement, OutlineSettings};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Result type voor het lezen van sessies.
pub type ParseResult<T> = Result<T, ParseError>;

/// Beschrijft fouten tijdens het lezen of schrijven van een sessie.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Het XML-document kon niet ge(de)serialiseerd worden.
    #[error("XML parsefout: {0}")]
    Xml(#[from] quick_xml::DeError),
    /// Een instelling valt buiten het toegestane bereik.
    #[error("ongeldige instelling: {0}")]
    Config(#[from] ConfigError),
    /// Een punt bevat een niet-eindige coördinaat.
    #[error("ongeldig punt op index {0}")]
    Point(usize),
    /// Het document heeft geen `<outline>` root.
    #[error("onbekend sessieformaat: geen <outline> root gevonden")]
    UnknownRoot,
}

/// Volledige inhoud van een sessiebestand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "outline")]
pub struct OutlineSession {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@closed", default)]
    pub closed: bool,
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<SessionCalibration>,
    #[serde(default, rename = "point")]
    pub points: Vec<SessionPoint>,
}

/// Scalaire instellingen zoals ze in het bestand staan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(rename = "@power")]
    pub power: u32,
    #[serde(rename = "@highest")]
    pub highest: usize,
    #[serde(rename = "@normalization", default)]
    pub normalization: usize,
    #[serde(rename = "@method", default)]
    pub method: String,
    #[serde(rename = "@strategy", default)]
    pub strategy: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&OutlineSettings::default())
    }
}

impl From<&OutlineSettings> for SessionSettings {
    fn from(settings: &OutlineSettings) -> Self {
        Self {
            power: settings.resampling_power(),
            highest: settings.highest_coefficient(),
            normalization: settings.normalization_index(),
            method: settings.method().label().to_owned(),
            strategy: settings.strategy().label().to_owned(),
        }
    }
}

impl SessionSettings {
    /// Valideert de waarden en zet ze om naar [`OutlineSettings`].
    ///
    /// # Errors
    /// Waarden buiten hun bereik of onbekende labels.
    pub fn to_settings(&self) -> ParseResult<OutlineSettings> {
        let method = DescriptorMethod::parse(&self.method)?;
        let strategy = if self.strategy.trim().is_empty() {
            TangentStrategy::default()
        } else {
            TangentStrategy::from_label(&self.strategy)
                .ok_or_else(|| ConfigError::UnknownStrategy(self.strategy.clone()))?
        };
        Ok(OutlineSettings::new(
            self.power,
            self.highest,
            self.normalization,
            method,
            strategy,
        )?)
    }
}

/// Kalibratie: factor in eenheden per pixel en de oorsprong in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionCalibration {
    #[serde(rename = "@factor", default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    #[serde(rename = "@origin-x", default, skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    #[serde(rename = "@origin-y", default, skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<f64>,
}

impl SessionCalibration {
    fn capture(calibration: &Calibration) -> Option<Self> {
        let origin = calibration.origin();
        if calibration.factor().is_none() && origin.is_none() {
            return None;
        }
        Some(Self {
            factor: calibration.factor(),
            origin_x: origin.map(|p| p.x),
            origin_y: origin.map(|p| p.y),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionPoint {
    #[serde(rename = "@x")]
    pub x: f64,
    #[serde(rename = "@y")]
    pub y: f64,
}

impl From<Point2> for SessionPoint {
    fn from(p: Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<SessionPoint> for Point2 {
    fn from(p: SessionPoint) -> Self {
        Self::new(p.x, p.y)
    }
}

impl OutlineSession {
    /// Legt de invoer van een meting vast.
    #[must_use]
    pub fn capture(
        name: impl Into<String>,
        measurement: &OutlineMeasurement,
        calibration: &Calibration,
    ) -> Self {
        Self {
            name: name.into(),
            closed: measurement.is_closed(),
            settings: SessionSettings::from(measurement.settings()),
            calibration: SessionCalibration::capture(calibration),
            points: measurement
                .knots()
                .iter()
                .copied()
                .map(SessionPoint::from)
                .collect(),
        }
    }

    /// De punten als [`Point2`].
    #[must_use]
    pub fn knots(&self) -> Vec<Point2> {
        self.points.iter().copied().map(Point2::from).collect()
    }

    /// # Errors
    /// Een kalibratiefactor die niet positief en eindig is, of een
    /// oorsprong met niet-eindige coördinaten.
    pub fn calibration(&self) -> ParseResult<Calibration> {
        let Some(stored) = self.calibration else {
            return Ok(Calibration::default());
        };
        let mut calibration = match stored.factor {
            Some(factor) => Calibration::with_factor(factor)?,
            None => Calibration::default(),
        };
        if let (Some(x), Some(y)) = (stored.origin_x, stored.origin_y) {
            calibration = calibration.with_origin(Point2::new(x, y))?;
        }
        Ok(calibration)
    }

    /// Bouwt een nieuwe meting met de opgeslagen invoer.
    ///
    /// # Errors
    /// Ongeldige instellingen, kalibratie of punten.
    pub fn restore(&self) -> ParseResult<(OutlineMeasurement, Calibration)> {
        if let Some(index) = self
            .points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(ParseError::Point(index));
        }
        let settings = self.settings.to_settings()?;
        let calibration = self.calibration()?;

        let mut measurement = OutlineMeasurement::with_settings(settings);
        measurement.set_knots(self.knots(), self.closed);
        Ok((measurement, calibration))
    }
}

/// Leest een sessiedocument.
///
/// # Errors
/// XML-fouten of een document zonder `<outline>` root.
pub fn parse_str(input: &str) -> ParseResult<OutlineSession> {
    let trimmed = strip_xml_preamble(input);
    let prefix = trimmed.chars().take(8).collect::<String>().to_lowercase();
    if !prefix.starts_with("<outline") {
        return Err(ParseError::UnknownRoot);
    }

    let session: OutlineSession = from_str(trimmed)?;
    log::debug!(
        "Sessie '{}' geladen met {} punten",
        session.name,
        session.points.len()
    );
    Ok(session)
}

/// Schrijft een sessie als XML-document.
///
/// # Errors
/// Serialisatiefouten van quick-xml.
pub fn to_xml_string(session: &OutlineSession) -> ParseResult<String> {
    let body = quick_xml::se::to_string(session)?;
    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

fn strip_xml_preamble(input: &str) -> &str {
    let trimmed = input.trim_start_matches(|c: char| c == '\u{feff}' || c.is_whitespace());
    if let Some(rest) = trimmed.strip_prefix("<?xml") {
        if let Some(idx) = rest.find("?>") {
            return rest[idx + 2..].trim_start();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<outline name="shell" closed="true">
  <settings power="5" highest="12" normalization="2" method="tangent-vs-arclength" strategy="chord"/>
  <calibration factor="0.5" origin-x="2" origin-y="1"/>
  <point x="0" y="0"/>
  <point x="10" y="0"/>
  <point x="10" y="5.5"/>
  <point x="0" y="5.5"/>
</outline>
"#;

    #[test]
    fn parses_sample_session() {
        let session = parse_str(SAMPLE).expect("sessie geladen");
        assert_eq!(session.name, "shell");
        assert!(session.closed);
        assert_eq!(session.points.len(), 4);
        assert_eq!(session.knots()[2], Point2::new(10.0, 5.5));

        let (measurement, calibration) = session.restore().expect("meting hersteld");
        let settings = measurement.settings();
        assert_eq!(settings.resampling_power(), 5);
        assert_eq!(settings.highest_coefficient(), 12);
        assert_eq!(settings.normalization_index(), 2);
        assert_eq!(settings.method(), DescriptorMethod::TangentVsArclength);
        assert_eq!(settings.strategy(), TangentStrategy::Chord);
        assert_eq!(calibration.factor(), Some(0.5));
        assert_eq!(calibration.origin(), Some(Point2::new(2.0, 1.0)));
        assert_eq!(
            calibration.point(Point2::new(10.0, 5.0)),
            Some(Point2::new(4.0, 2.0))
        );
    }

    #[test]
    fn factor_without_origin_survives_round_trip() {
        let xml = SAMPLE.replace(r#" origin-x="2" origin-y="1""#, "");
        let calibration = parse_str(&xml).unwrap().calibration().unwrap();
        assert_eq!(calibration.factor(), Some(0.5));
        assert!(calibration.origin().is_none());

        let (measurement, _) = parse_str(&xml).unwrap().restore().unwrap();
        let session = OutlineSession::capture("shell", &measurement, &calibration);
        let saved = to_xml_string(&session).unwrap();
        assert!(!saved.contains("origin-x"));
        assert_eq!(parse_str(&saved).unwrap().calibration().unwrap(), calibration);
    }

    #[test]
    fn save_then_load_reproduces_inputs() {
        let session = parse_str(SAMPLE).unwrap();
        let xml = to_xml_string(&session).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        let reloaded = parse_str(&xml).unwrap();
        assert_eq!(reloaded, session);
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let xml = SAMPLE.replace(r#"power="5""#, r#"power="8""#);
        let session = parse_str(&xml).unwrap();
        assert!(matches!(
            session.restore(),
            Err(ParseError::Config(ConfigError::ResamplingPower { value: 8, .. }))
        ));
    }

    #[test]
    fn rejects_unknown_root() {
        assert!(matches!(
            parse_str("<ghx></ghx>"),
            Err(ParseError::UnknownRoot)
        ));
    }
}
