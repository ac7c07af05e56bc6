//! Calculator tool: arithmetic expressions and unit conversions.
//!
//! Expressions are evaluated by a small recursive-descent parser, so
//! nothing outside numbers, arithmetic operators, and a short list of
//! math functions can run.

use async_trait::async_trait;

use super::{Tool, ToolError, ToolResult};

/// Unit conversion factors, (from, to, factor).
const UNIT_CONVERSIONS: &[(&str, &str, f64)] = &[
    // Length
    ("km", "miles", 0.621371),
    ("miles", "km", 1.60934),
    ("m", "ft", 3.28084),
    ("ft", "m", 0.3048),
    ("cm", "inches", 0.393701),
    ("inches", "cm", 2.54),
    // Weight
    ("kg", "lbs", 2.20462),
    ("lbs", "kg", 0.453592),
    ("g", "oz", 0.035274),
    ("oz", "g", 28.3495),
    // Volume
    ("liters", "gallons", 0.264172),
    ("gallons", "liters", 3.78541),
];

const NATURAL_PREFIXES: &[&str] = &["what is ", "calculate ", "compute ", "solve "];

/// Math calculations and unit conversions.
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Calculate math expressions and convert units."
    }

    fn actions(&self) -> &[&str] {
        &["compute", "convert_units"]
    }

    async fn execute(
        &self,
        action: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ToolResult, ToolError> {
        match action {
            "compute" => compute(params),
            "convert_units" => convert_units(params),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn compute(params: &serde_json::Map<String, serde_json::Value>) -> Result<ToolResult, ToolError> {
    let raw = params
        .get("expression")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if raw.is_empty() {
        return Err(ToolError::InvalidArgs(
            "missing 'expression' parameter".to_string(),
        ));
    }

    let expression = normalize_expression(raw);
    let value = Parser::new(&expression)
        .parse()
        .map_err(|e| ToolError::ExecutionFailed(format!("invalid expression: {e}")))?;
    if !value.is_finite() {
        return Err(ToolError::ExecutionFailed(
            "invalid expression: result is not finite".to_string(),
        ));
    }

    Ok(ToolResult::text(format!(
        "{expression} = {}",
        format_number(value)
    )))
}

/// Strip natural-language wrapping and normalize operator symbols.
fn normalize_expression(raw: &str) -> String {
    let mut expr = raw.trim();
    let lower = expr.to_lowercase();
    for prefix in NATURAL_PREFIXES {
        if lower.starts_with(prefix) {
            expr = &expr[prefix.len()..];
            break;
        }
    }
    expr.replace('×', "*").replace('÷', "/").replace("**", "^")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{value:.6}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn convert_units(
    params: &serde_json::Map<String, serde_json::Value>,
) -> Result<ToolResult, ToolError> {
    let value = match params.get("value") {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ToolError::InvalidArgs("missing or invalid 'value'".to_string()))?;

    let unit = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_lowercase)
            .unwrap_or_default()
    };
    let from = unit("from");
    let to = unit("to");
    if from.is_empty() || to.is_empty() {
        return Err(ToolError::InvalidArgs(
            "missing 'from' or 'to' unit".to_string(),
        ));
    }

    // Temperature is affine, not a plain factor.
    let celsius = ["c", "celsius"];
    let fahrenheit = ["f", "fahrenheit"];
    if celsius.contains(&from.as_str()) && fahrenheit.contains(&to.as_str()) {
        let result = value * 9.0 / 5.0 + 32.0;
        return Ok(ToolResult::text(format!("{value}°C = {result:.1}°F")));
    }
    if fahrenheit.contains(&from.as_str()) && celsius.contains(&to.as_str()) {
        let result = (value - 32.0) * 5.0 / 9.0;
        return Ok(ToolResult::text(format!("{value}°F = {result:.1}°C")));
    }

    let factor = UNIT_CONVERSIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, factor)| *factor)
        .ok_or_else(|| ToolError::ExecutionFailed(format!("unknown conversion: {from} to {to}")))?;

    let result = value * factor;
    Ok(ToolResult::text(format!(
        "{value} {from} = {} {to}",
        format_number((result * 10_000.0).round() / 10_000.0)
    )))
}

// ── expression parser ──

/// Recursive-descent parser over the grammar:
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := power (('*' | '/' | '%') power)*
/// power   := unary ('^' power)?          right-associative
/// unary   := ('-' | '+')* primary
/// primary := number | '(' expr ')' | name '(' expr ')'
/// ```
struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn parse(mut self) -> Result<f64, String> {
        let value = self.expr()?;
        self.skip_spaces();
        match self.chars.peek() {
            None => Ok(value),
            Some(c) => Err(format!("unexpected character '{c}'")),
        }
    }

    fn skip_spaces(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_spaces();
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.power()?;
        loop {
            if self.eat('*') {
                value *= self.power()?;
            } else if self.eat('/') {
                let divisor = self.power()?;
                if divisor == 0.0 {
                    return Err("division by zero".to_string());
                }
                value /= divisor;
            } else if self.eat('%') {
                let divisor = self.power()?;
                if divisor == 0.0 {
                    return Err("modulo by zero".to_string());
                }
                value = value.rem_euclid(divisor);
            } else {
                return Ok(value);
            }
        }
    }

    fn power(&mut self) -> Result<f64, String> {
        let base = self.unary()?;
        if self.eat('^') {
            let exponent = self.power()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn unary(&mut self) -> Result<f64, String> {
        if self.eat('-') {
            Ok(-self.unary()?)
        } else if self.eat('+') {
            self.unary()
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<f64, String> {
        self.skip_spaces();
        match self.chars.peek() {
            Some('(') => {
                self.chars.next();
                let value = self.expr()?;
                if !self.eat(')') {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || *c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.function_call(),
            Some(c) => Err(format!("unexpected character '{c}'")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn number(&mut self) -> Result<f64, String> {
        let mut text = String::new();
        while self
            .chars
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            text.push(self.chars.next().unwrap());
        }
        text.parse::<f64>().map_err(|_| format!("bad number '{text}'"))
    }

    fn function_call(&mut self) -> Result<f64, String> {
        let mut name = String::new();
        while self.chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            name.push(self.chars.next().unwrap());
        }
        if !self.eat('(') {
            return Err(format!("expected '(' after '{name}'"));
        }
        let arg = self.expr()?;
        if !self.eat(')') {
            return Err("missing closing parenthesis".to_string());
        }
        match name.as_str() {
            "sqrt" => {
                if arg < 0.0 {
                    Err("square root of negative number".to_string())
                } else {
                    Ok(arg.sqrt())
                }
            }
            "abs" => Ok(arg.abs()),
            "sin" => Ok(arg.sin()),
            "cos" => Ok(arg.cos()),
            "tan" => Ok(arg.tan()),
            "log" => {
                if arg <= 0.0 {
                    Err("logarithm of non-positive number".to_string())
                } else {
                    Ok(arg.ln())
                }
            }
            "exp" => Ok(arg.exp()),
            "floor" => Ok(arg.floor()),
            "ceil" => Ok(arg.ceil()),
            other => Err(format!("unsupported function '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute_params(expression: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut params = serde_json::Map::new();
        params.insert("expression".to_string(), serde_json::json!(expression));
        params
    }

    async fn run_compute(expression: &str) -> Result<ToolResult, ToolError> {
        CalculatorTool
            .execute("compute", &compute_params(expression))
            .await
    }

    #[tokio::test]
    async fn basic_arithmetic_with_precedence() {
        let result = run_compute("2 + 2 * 3").await.unwrap();
        assert_eq!(result.data, "2 + 2 * 3 = 8");

        let result = run_compute("(2 + 2) * 3").await.unwrap();
        assert_eq!(result.data, "(2 + 2) * 3 = 12");
    }

    #[tokio::test]
    async fn power_and_modulo() {
        let result = run_compute("2 ^ 10").await.unwrap();
        assert!(result.data.ends_with("= 1024"));

        let result = run_compute("2 ** 8").await.unwrap();
        assert!(result.data.ends_with("= 256"));

        let result = run_compute("100 % 7").await.unwrap();
        assert!(result.data.ends_with("= 2"));
    }

    #[tokio::test]
    async fn power_is_right_associative() {
        // 2^(3^2) = 512, not (2^3)^2 = 64.
        let result = run_compute("2 ^ 3 ^ 2").await.unwrap();
        assert!(result.data.ends_with("= 512"));
    }

    #[tokio::test]
    async fn unary_minus_and_decimals() {
        let result = run_compute("-3 + 10").await.unwrap();
        assert!(result.data.ends_with("= 7"));

        let result = run_compute("1.5 * 4").await.unwrap();
        assert!(result.data.ends_with("= 6"));

        let result = run_compute("1 / 4").await.unwrap();
        assert!(result.data.ends_with("= 0.25"));
    }

    #[tokio::test]
    async fn natural_language_prefixes_are_stripped() {
        let result = run_compute("what is 6 * 7").await.unwrap();
        assert_eq!(result.data, "6 * 7 = 42");

        let result = run_compute("Calculate 10 - 4").await.unwrap();
        assert!(result.data.ends_with("= 6"));
    }

    #[tokio::test]
    async fn unicode_operators_are_normalized() {
        let result = run_compute("6 × 7").await.unwrap();
        assert!(result.data.ends_with("= 42"));

        let result = run_compute("10 ÷ 4").await.unwrap();
        assert!(result.data.ends_with("= 2.5"));
    }

    #[tokio::test]
    async fn math_functions() {
        let result = run_compute("sqrt(144)").await.unwrap();
        assert!(result.data.ends_with("= 12"));

        let result = run_compute("abs(-5) + floor(2.9)").await.unwrap();
        assert!(result.data.ends_with("= 7"));
    }

    #[tokio::test]
    async fn division_by_zero_is_an_error() {
        let err = run_compute("1 / 0").await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
        assert!(err.to_string().contains("division by zero"));
    }

    #[tokio::test]
    async fn garbage_expressions_error() {
        assert!(run_compute("2 +").await.is_err());
        assert!(run_compute("hello world").await.is_err());
        assert!(run_compute("(1 + 2").await.is_err());
        assert!(run_compute("__import__('os')").await.is_err());
    }

    #[tokio::test]
    async fn missing_expression_is_invalid_args() {
        let err = CalculatorTool
            .execute("compute", &serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn unit_conversion_by_factor() {
        let mut params = serde_json::Map::new();
        params.insert("value".to_string(), serde_json::json!(10));
        params.insert("from".to_string(), serde_json::json!("km"));
        params.insert("to".to_string(), serde_json::json!("miles"));

        let result = CalculatorTool
            .execute("convert_units", &params)
            .await
            .unwrap();
        assert!(result.data.contains("6.2137"));
    }

    #[tokio::test]
    async fn temperature_conversion_is_affine() {
        let mut params = serde_json::Map::new();
        params.insert("value".to_string(), serde_json::json!(100));
        params.insert("from".to_string(), serde_json::json!("c"));
        params.insert("to".to_string(), serde_json::json!("f"));

        let result = CalculatorTool
            .execute("convert_units", &params)
            .await
            .unwrap();
        assert_eq!(result.data, "100°C = 212.0°F");

        let mut params = serde_json::Map::new();
        params.insert("value".to_string(), serde_json::json!(32));
        params.insert("from".to_string(), serde_json::json!("fahrenheit"));
        params.insert("to".to_string(), serde_json::json!("celsius"));

        let result = CalculatorTool
            .execute("convert_units", &params)
            .await
            .unwrap();
        assert_eq!(result.data, "32°F = 0.0°C");
    }

    #[tokio::test]
    async fn unknown_conversion_errors() {
        let mut params = serde_json::Map::new();
        params.insert("value".to_string(), serde_json::json!(1));
        params.insert("from".to_string(), serde_json::json!("km"));
        params.insert("to".to_string(), serde_json::json!("lbs"));

        let err = CalculatorTool
            .execute("convert_units", &params)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown conversion"));
    }

    #[tokio::test]
    async fn string_value_is_accepted() {
        let mut params = serde_json::Map::new();
        params.insert("value".to_string(), serde_json::json!("2.5"));
        params.insert("from".to_string(), serde_json::json!("kg"));
        params.insert("to".to_string(), serde_json::json!("lbs"));

        let result = CalculatorTool
            .execute("convert_units", &params)
            .await
            .unwrap();
        assert!(result.data.contains("5.5116"));
    }

    #[tokio::test]
    async fn unknown_action_errors() {
        let err = CalculatorTool
            .execute("launch_missiles", &serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownAction(_)));
    }
}
