use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// How customs duty is declared and paid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationMethod {
    /// The recipient settles with customs directly.
    SelfDeclare,
    /// Duties paid by the sender and bundled into the courier charge.
    Ddp,
    /// A broker handles the declaration for a fee.
    Agent,
    /// Any method the form offers that the calculator has no rule for.
    #[serde(other)]
    Other,
}

impl DeclarationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfDeclare => "self-declare",
            Self::Ddp => "ddp",
            Self::Agent => "agent",
            Self::Other => "other",
        }
    }

    /// Whether fees are prepaid through the courier rather than collected on delivery.
    pub fn included_in_courier(&self) -> bool {
        matches!(self, Self::Ddp | Self::Agent)
    }
}

impl fmt::Display for DeclarationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "self-declare" | "self_declare" | "self" => Self::SelfDeclare,
            "ddp" => Self::Ddp,
            "agent" => Self::Agent,
            _ => Self::Other,
        })
    }
}

/// Input to the customs calculator. `declared_value` is in the reporting
/// currency, the same one the agent fee is expressed in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomsFeeParams {
    pub country: String,
    pub declaration_method: DeclarationMethod,
    pub courier: String,
    pub declared_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcb_type: Option<String>,
}

impl CustomsFeeParams {
    pub fn new(
        country: impl Into<String>,
        declaration_method: DeclarationMethod,
        courier: impl Into<String>,
        declared_value: Decimal,
    ) -> Self {
        Self {
            country: country.into(),
            declaration_method,
            courier: courier.into(),
            declared_value,
            pcb_type: None,
        }
    }

    pub fn with_pcb_type(mut self, pcb_type: impl Into<String>) -> Self {
        self.pcb_type = Some(pcb_type.into());
        self
    }

    /// Opt-in boundary check. The calculator never calls this.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.declared_value < Decimal::ZERO {
            return Err(ValidationError::NegativeDeclaredValue(self.declared_value));
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Country is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fee breakdown. `total == duty + vat + agent_fee`, and `agent_fee` is zero
/// unless `included_in_courier`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomsFeeResult {
    pub duty: Decimal,
    pub vat: Decimal,
    pub agent_fee: Decimal,
    pub total: Decimal,
    pub included_in_courier: bool,
    pub explain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_declaration_method_serde() {
        let method: DeclarationMethod = serde_json::from_str("\"self-declare\"").unwrap();
        assert_eq!(method, DeclarationMethod::SelfDeclare);
        let method: DeclarationMethod = serde_json::from_str("\"ddp\"").unwrap();
        assert_eq!(method, DeclarationMethod::Ddp);
        let method: DeclarationMethod = serde_json::from_str("\"postal\"").unwrap();
        assert_eq!(method, DeclarationMethod::Other);

        assert_eq!(
            serde_json::to_string(&DeclarationMethod::SelfDeclare).unwrap(),
            "\"self-declare\""
        );
    }

    #[test]
    fn test_declaration_method_from_str() {
        assert_eq!(
            "Agent".parse::<DeclarationMethod>().unwrap(),
            DeclarationMethod::Agent
        );
        assert_eq!(
            "self_declare".parse::<DeclarationMethod>().unwrap(),
            DeclarationMethod::SelfDeclare
        );
        assert_eq!(
            "dap".parse::<DeclarationMethod>().unwrap(),
            DeclarationMethod::Other
        );
    }

    #[test]
    fn test_included_in_courier() {
        assert!(DeclarationMethod::Ddp.included_in_courier());
        assert!(DeclarationMethod::Agent.included_in_courier());
        assert!(!DeclarationMethod::SelfDeclare.included_in_courier());
        assert!(!DeclarationMethod::Other.included_in_courier());
    }

    #[test]
    fn test_params_from_form_json() {
        let params: CustomsFeeParams = serde_json::from_str(
            r#"{"country":"DE","declarationMethod":"ddp","courier":"DHL","declaredValue":100,"pcbType":"rigid"}"#,
        )
        .unwrap();
        assert_eq!(params.country, "DE");
        assert_eq!(params.declaration_method, DeclarationMethod::Ddp);
        assert_eq!(params.declared_value, dec!(100));
        assert_eq!(params.pcb_type.as_deref(), Some("rigid"));
    }

    #[test]
    fn test_validate() {
        let params = CustomsFeeParams::new("US", DeclarationMethod::Ddp, "DHL", dec!(0));
        assert!(params.validate().is_ok());

        let params = CustomsFeeParams::new("US", DeclarationMethod::Ddp, "DHL", dec!(-1));
        assert!(matches!(
            params.validate(),
            Err(ValidationError::NegativeDeclaredValue(_))
        ));

        let params = CustomsFeeParams::new(" ", DeclarationMethod::Ddp, "DHL", dec!(10));
        assert!(matches!(
            params.validate(),
            Err(ValidationError::InvalidInput(_))
        ));
    }
}
