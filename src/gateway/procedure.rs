//! Stored procedure descriptors and named argument binding

use crate::core::error::GatewayError;
use crate::gateway::value::SqlValue;
use indexmap::IndexMap;
use std::fmt;

/// Discover the `@name` parameters of a query template.
///
/// Tokens start at `@` and end at whitespace, `,`, `;` or `)`. Names are
/// returned without the `@`, in order of first appearance.
pub fn scan_parameters(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '@' {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(idx, next)) = chars.peek() {
            if next.is_whitespace() || matches!(next, ',' | ';' | ')' | '(' | '@') {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }
        let name = &template[start + 1..end];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}

/// A stored procedure: its name and the parameters it declares, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    name: String,
    parameters: Vec<String>,
}

impl Procedure {
    /// Build a procedure from an explicit name and parameter list
    pub fn new(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Parse a query template such as `EXEC SP_AddProduct @Name, @Price`.
    ///
    /// The procedure name is the first token after an optional `EXEC`,
    /// `EXECUTE` or `CALL` keyword.
    pub fn parse(template: &str) -> Self {
        let mut tokens = template.split_whitespace();
        let mut head = tokens.next().unwrap_or_default();
        if ["EXEC", "EXECUTE", "CALL"]
            .iter()
            .any(|kw| head.eq_ignore_ascii_case(kw))
        {
            head = tokens.next().unwrap_or_default();
        }
        let name = head
            .split(|c: char| c == '(' || c == ';' || c == ',')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            name,
            parameters: scan_parameters(template),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn declares(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p == parameter)
    }

    /// Start binding arguments for one invocation
    pub fn call(&'static self) -> CallBuilder {
        CallBuilder {
            procedure: self,
            bound: IndexMap::new(),
            unknown: Vec::new(),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| format!("@{}", p)).collect();
        write!(f, "{} {}", self.name, params.join(", "))
    }
}

/// Collects named arguments for a procedure. Order of `bind` calls is
/// irrelevant; mismatches surface from [`CallBuilder::finish`].
#[derive(Debug)]
pub struct CallBuilder {
    procedure: &'static Procedure,
    bound: IndexMap<String, SqlValue>,
    unknown: Vec<String>,
}

impl CallBuilder {
    pub fn bind(mut self, name: &str, value: impl Into<SqlValue>) -> Self {
        if self.procedure.declares(name) {
            self.bound.insert(name.to_string(), value.into());
        } else {
            self.unknown.push(name.to_string());
        }
        self
    }

    /// Validate the bindings and produce a ready-to-run call.
    pub fn finish(self) -> Result<Call, GatewayError> {
        if let Some(name) = self.unknown.into_iter().next() {
            return Err(GatewayError::UnknownParameter {
                procedure: self.procedure.name().to_string(),
                parameter: name,
            });
        }

        let mut arguments = IndexMap::with_capacity(self.procedure.parameters().len());
        let mut bound = self.bound;
        for parameter in self.procedure.parameters() {
            let value = bound
                .swap_remove(parameter)
                .ok_or_else(|| GatewayError::UnboundParameter {
                    procedure: self.procedure.name().to_string(),
                    parameter: parameter.clone(),
                })?;
            arguments.insert(parameter.clone(), value);
        }

        Ok(Call {
            procedure: self.procedure,
            arguments,
        })
    }
}

/// A fully bound procedure invocation. Arguments are held in the
/// procedure's declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    procedure: &'static Procedure,
    arguments: IndexMap<String, SqlValue>,
}

impl Call {
    pub fn procedure(&self) -> &'static Procedure {
        self.procedure
    }

    pub fn name(&self) -> &str {
        self.procedure.name()
    }

    pub fn argument(&self, name: &str) -> Option<&SqlValue> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> &IndexMap<String, SqlValue> {
        &self.arguments
    }

    /// Values in declared order, ready for positional placeholders
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.arguments.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static ADD_PRODUCT: LazyLock<Procedure> = LazyLock::new(|| {
        Procedure::parse("EXEC SP_AddProduct @Name, @Price, @Quantity")
    });

    #[test]
    fn test_scan_stops_at_delimiters() {
        let names = scan_parameters("EXEC P @A,@B;@C) @D\t@E");
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_scan_deduplicates_in_order() {
        let names = scan_parameters("SELECT * WHERE x = @Id OR y = @Name OR z = @Id");
        assert_eq!(names, vec!["Id", "Name"]);
    }

    #[test]
    fn test_scan_ignores_bare_at() {
        assert!(scan_parameters("EXEC P @ , @").is_empty());
    }

    #[test]
    fn test_parse_strips_keyword() {
        let proc = Procedure::parse("exec SP_GetProductByID @ProductID");
        assert_eq!(proc.name(), "SP_GetProductByID");
        assert_eq!(proc.parameters(), ["ProductID"]);

        let proc = Procedure::parse("CALL SP_GetAll()");
        assert_eq!(proc.name(), "SP_GetAll");
        assert!(proc.parameters().is_empty());
    }

    #[test]
    fn test_binding_order_is_irrelevant() {
        let call = ADD_PRODUCT
            .call()
            .bind("Quantity", 3)
            .bind("Name", "Widget")
            .bind("Price", 2)
            .finish()
            .unwrap();
        let names: Vec<&String> = call.arguments().keys().collect();
        assert_eq!(names, ["Name", "Price", "Quantity"]);
        assert_eq!(call.argument("Quantity"), Some(&SqlValue::Int(3)));
    }

    #[test]
    fn test_unbound_parameter_is_rejected() {
        let err = ADD_PRODUCT
            .call()
            .bind("Name", "Widget")
            .bind("Price", 2)
            .finish()
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UnboundParameter { ref parameter, .. } if parameter == "Quantity"
        ));
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let err = ADD_PRODUCT
            .call()
            .bind("Name", "Widget")
            .bind("Price", 2)
            .bind("Quantity", 1)
            .bind("Colour", "red")
            .finish()
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UnknownParameter { ref parameter, .. } if parameter == "Colour"
        ));
    }
}
