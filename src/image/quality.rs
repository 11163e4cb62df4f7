// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `ImageQuery`: a declarative predicate over [ImageParameters] fields,
//! parsed once at startup into an evaluator.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::parameters::ImageParameters;

#[derive(Error, Debug)]
pub enum QualityPredicateError {
    #[error("unknown field '{0}' in image quality predicate")]
    UnknownField(String),

    #[error("unexpected end of input while parsing image quality predicate")]
    UnexpectedEnd,

    #[error("unexpected token '{0}' in image quality predicate")]
    UnexpectedToken(String),

    #[error("could not parse '{0}' as a numeric literal")]
    BadNumber(String),
}

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r">=|<=|==|!=|&&|\|\||[><()]|[A-Za-z_][A-Za-z0-9_]*|[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?"
    )
    .unwrap();
}

fn tokenize(s: &str) -> Vec<String> {
    TOKEN_RE.find_iter(s).map(|m| m.as_str().to_string()).collect()
}

/// The known [ImageParameters] fields an `ImageQuery` can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    HillasIntensity,
    HillasX,
    HillasY,
    HillasLength,
    HillasWidth,
    HillasPsi,
    HillasR,
    HillasPhi,
    HillasSkewness,
    HillasKurtosis,
    LeakagePixelsWidth1,
    LeakagePixelsWidth2,
    LeakageIntensityWidth1,
    LeakageIntensityWidth2,
    ConcentrationCog,
    ConcentrationCore,
    ConcentrationPixel,
    MorphologyNPixels,
    MorphologyNIslands,
    MorphologyNSmallIslands,
    MorphologyNMediumIslands,
    MorphologyNLargeIslands,
    IntensityMax,
    IntensityMean,
    IntensityStd,
    IntensitySkewness,
    IntensityKurtosis,
}

impl Field {
    fn parse(s: &str) -> Result<Self, QualityPredicateError> {
        use Field::*;
        Ok(match s {
            "hillas_intensity" => HillasIntensity,
            "hillas_x" => HillasX,
            "hillas_y" => HillasY,
            "hillas_length" => HillasLength,
            "hillas_width" => HillasWidth,
            "hillas_psi" => HillasPsi,
            "hillas_r" => HillasR,
            "hillas_phi" => HillasPhi,
            "hillas_skewness" => HillasSkewness,
            "hillas_kurtosis" => HillasKurtosis,
            "leakage_pixels_width_1" => LeakagePixelsWidth1,
            "leakage_pixels_width_2" => LeakagePixelsWidth2,
            "leakage_intensity_width_1" => LeakageIntensityWidth1,
            "leakage_intensity_width_2" => LeakageIntensityWidth2,
            "concentration_cog" => ConcentrationCog,
            "concentration_core" => ConcentrationCore,
            "concentration_pixel" => ConcentrationPixel,
            "morphology_n_pixels" => MorphologyNPixels,
            "morphology_n_islands" => MorphologyNIslands,
            "morphology_n_small_islands" => MorphologyNSmallIslands,
            "morphology_n_medium_islands" => MorphologyNMediumIslands,
            "morphology_n_large_islands" => MorphologyNLargeIslands,
            "intensity_max" => IntensityMax,
            "intensity_mean" => IntensityMean,
            "intensity_std" => IntensityStd,
            "intensity_skewness" => IntensitySkewness,
            "intensity_kurtosis" => IntensityKurtosis,
            other => return Err(QualityPredicateError::UnknownField(other.to_string())),
        })
    }

    fn get(self, p: &ImageParameters) -> f64 {
        use Field::*;
        match self {
            HillasIntensity => p.hillas.intensity,
            HillasX => p.hillas.x,
            HillasY => p.hillas.y,
            HillasLength => p.hillas.length,
            HillasWidth => p.hillas.width,
            HillasPsi => p.hillas.psi,
            HillasR => p.hillas.r,
            HillasPhi => p.hillas.phi,
            HillasSkewness => p.hillas.skewness,
            HillasKurtosis => p.hillas.kurtosis,
            LeakagePixelsWidth1 => p.leakage.pixels_width_1,
            LeakagePixelsWidth2 => p.leakage.pixels_width_2,
            LeakageIntensityWidth1 => p.leakage.intensity_width_1,
            LeakageIntensityWidth2 => p.leakage.intensity_width_2,
            ConcentrationCog => p.concentration.concentration_cog,
            ConcentrationCore => p.concentration.concentration_core,
            ConcentrationPixel => p.concentration.concentration_pixel,
            MorphologyNPixels => p.morphology.n_pixels as f64,
            MorphologyNIslands => p.morphology.n_islands as f64,
            MorphologyNSmallIslands => p.morphology.n_small_islands as f64,
            MorphologyNMediumIslands => p.morphology.n_medium_islands as f64,
            MorphologyNLargeIslands => p.morphology.n_large_islands as f64,
            IntensityMax => p.intensity.intensity_max,
            IntensityMean => p.intensity.intensity_mean,
            IntensityStd => p.intensity.intensity_std,
            IntensitySkewness => p.intensity.intensity_skewness,
            IntensityKurtosis => p.intensity.intensity_kurtosis,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CmpOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl CmpOp {
    fn apply(self, a: f64, b: f64) -> bool {
        match self {
            CmpOp::Gt => a > b,
            CmpOp::Lt => a < b,
            CmpOp::Ge => a >= b,
            CmpOp::Le => a <= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
        }
    }
}

#[derive(Clone, Debug)]
enum Expr {
    Cmp(Field, CmpOp, f64),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, p: &ImageParameters) -> bool {
        match self {
            Expr::Cmp(field, op, literal) => op.apply(field.get(p), *literal),
            Expr::And(a, b) => a.eval(p) && b.eval(p),
            Expr::Or(a, b) => a.eval(p) || b.eval(p),
        }
    }
}

/// A parsed, reusable image-quality predicate.
#[derive(Clone, Debug)]
pub struct ImageQuery {
    source: String,
    expr: Expr,
}

impl ImageQuery {
    /// Parse a predicate string once. Fails at parse time, not evaluation
    /// time, if it references an unknown field.
    pub fn parse(source: &str) -> Result<Self, QualityPredicateError> {
        let tokens = tokenize(source);
        let mut parser = Parser { tokens: &tokens, pos: 0 };
        let expr = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(QualityPredicateError::UnexpectedToken(
                parser.tokens[parser.pos].clone(),
            ));
        }
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn evaluate(&self, params: &ImageParameters) -> bool {
        self.expr.eval(params)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn bump(&mut self) -> Result<String, QualityPredicateError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(QualityPredicateError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn parse_or(&mut self) -> Result<Expr, QualityPredicateError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some("||") {
            self.bump()?;
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, QualityPredicateError> {
        let mut lhs = self.parse_atom()?;
        while self.peek() == Some("&&") {
            self.bump()?;
            let rhs = self.parse_atom()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self) -> Result<Expr, QualityPredicateError> {
        if self.peek() == Some("(") {
            self.bump()?;
            let inner = self.parse_or()?;
            match self.bump()?.as_str() {
                ")" => Ok(inner),
                other => Err(QualityPredicateError::UnexpectedToken(other.to_string())),
            }
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, QualityPredicateError> {
        let field_tok = self.bump()?;
        let field = Field::parse(&field_tok)?;
        let op = match self.bump()?.as_str() {
            ">" => CmpOp::Gt,
            "<" => CmpOp::Lt,
            ">=" => CmpOp::Ge,
            "<=" => CmpOp::Le,
            "==" => CmpOp::Eq,
            "!=" => CmpOp::Ne,
            other => return Err(QualityPredicateError::UnexpectedToken(other.to_string())),
        };
        let lit_tok = self.bump()?;
        let literal: f64 = lit_tok
            .parse()
            .map_err(|_| QualityPredicateError::BadNumber(lit_tok.clone()))?;
        Ok(Expr::Cmp(field, op, literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::hillas::HillasParameters;
    use crate::image::{
        ConcentrationParameters, ExtraParameters, IntensityParameters, LeakageParameters,
        MorphologyParameters,
    };

    fn params_with(intensity: f64, leakage2: f64, width: f64, n_pixels: usize) -> ImageParameters {
        ImageParameters {
            hillas: HillasParameters {
                intensity,
                x: 0.0,
                y: 0.0,
                length: 1.0,
                width,
                psi: 0.0,
                r: 0.0,
                phi: 0.0,
                skewness: 0.0,
                kurtosis: 0.0,
            },
            leakage: LeakageParameters {
                pixels_width_1: 0.0,
                pixels_width_2: 0.0,
                intensity_width_1: 0.0,
                intensity_width_2: leakage2,
            },
            concentration: ConcentrationParameters {
                concentration_cog: 0.0,
                concentration_core: 0.0,
                concentration_pixel: 0.0,
            },
            morphology: MorphologyParameters {
                n_pixels,
                n_islands: 1,
                n_small_islands: 1,
                n_medium_islands: 0,
                n_large_islands: 0,
            },
            intensity: IntensityParameters {
                intensity_max: 0.0,
                intensity_mean: 0.0,
                intensity_std: 0.0,
                intensity_skewness: 0.0,
                intensity_kurtosis: 0.0,
            },
            extra: ExtraParameters::default(),
        }
    }

    #[test]
    fn example_predicate_from_spec() {
        let q = ImageQuery::parse(
            "hillas_intensity > 100 && leakage_intensity_width_2 < 0.3 && hillas_width > 0 && morphology_n_pixels >= 5",
        )
        .unwrap();
        assert!(q.evaluate(&params_with(150.0, 0.1, 0.5, 10)));
        assert!(!q.evaluate(&params_with(50.0, 0.1, 0.5, 10)));
        assert!(!q.evaluate(&params_with(150.0, 0.5, 0.5, 10)));
    }

    #[test]
    fn parentheses_and_or() {
        let q = ImageQuery::parse("(hillas_intensity > 100 || hillas_width > 10) && morphology_n_pixels >= 3").unwrap();
        assert!(q.evaluate(&params_with(150.0, 0.0, 0.0, 3)));
        assert!(q.evaluate(&params_with(0.0, 0.0, 20.0, 3)));
        assert!(!q.evaluate(&params_with(0.0, 0.0, 0.0, 3)));
    }

    #[test]
    fn unknown_field_fails_at_construction() {
        let err = ImageQuery::parse("not_a_field > 1").unwrap_err();
        assert!(matches!(err, QualityPredicateError::UnknownField(_)));
    }
}
