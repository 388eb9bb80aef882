//! Reference catalogue of integration rules and the canonical example problems,
//! served by `/rules` and `/examples` and printed by the CLI.

use crate::solver::integral_solver::{IntegralSolver, SolveResult};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleEntry {
    pub name: &'static str,
    pub formula: &'static str,
    /// typical integrands the rule handles
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCategory {
    pub name: &'static str,
    pub rules: Vec<RuleEntry>,
}

fn rule(name: &'static str, formula: &'static str) -> RuleEntry {
    RuleEntry {
        name,
        formula,
        forms: Vec::new(),
    }
}

pub fn rule_catalog() -> Vec<RuleCategory> {
    vec![
        RuleCategory {
            name: "Basic Rules",
            rules: vec![
                rule("Constant Rule", "∫ k dx = kx + C"),
                rule("Power Rule", "∫ xⁿ dx = xⁿ⁺¹/(n+1) + C (n ≠ -1)"),
                rule("Sum Rule", "∫ (f(x) + g(x)) dx = ∫ f(x) dx + ∫ g(x) dx"),
                rule("Difference Rule", "∫ (f(x) - g(x)) dx = ∫ f(x) dx - ∫ g(x) dx"),
            ],
        },
        RuleCategory {
            name: "Integration by Parts",
            rules: vec![RuleEntry {
                name: "Formula",
                formula: "∫ u dv = uv - ∫ v du",
                forms: vec!["∫ x·eˣ dx", "∫ x·sin(x) dx", "∫ x·ln(x) dx"],
            }],
        },
        RuleCategory {
            name: "Trigonometric Rules",
            rules: vec![
                rule("Sin", "∫ sin(x) dx = -cos(x) + C"),
                rule("Cos", "∫ cos(x) dx = sin(x) + C"),
                rule("Tan", "∫ tan(x) dx = -ln|cos(x)| + C"),
                rule("Sec²", "∫ sec²(x) dx = tan(x) + C"),
                rule("Sec·Tan", "∫ sec(x)tan(x) dx = sec(x) + C"),
            ],
        },
        RuleCategory {
            name: "Exponential Rules",
            rules: vec![
                rule("Natural", "∫ eˣ dx = eˣ + C"),
                rule("General", "∫ aˣ dx = aˣ/ln(a) + C"),
            ],
        },
        RuleCategory {
            name: "Logarithmic Rules",
            rules: vec![
                rule("Natural", "∫ (1/x) dx = ln|x| + C"),
                rule("General", "∫ ln(x) dx = x·ln(x) - x + C"),
            ],
        },
        RuleCategory {
            name: "Product Rule Related",
            rules: vec![
                rule("Formula", "∫ u·v dx requires Integration by Parts"),
                rule("Example", "∫ x·sin(x) dx = -x·cos(x) + ∫ cos(x) dx"),
            ],
        },
    ]
}

#[derive(Tabled)]
struct RuleRow {
    category: &'static str,
    rule: &'static str,
    formula: String,
}

/// The catalogue as a terminal table, one row per rule.
pub fn rules_table() -> String {
    let rows: Vec<RuleRow> = rule_catalog()
        .into_iter()
        .flat_map(|category| {
            let name = category.name;
            category.rules.into_iter().map(move |entry| RuleRow {
                category: name,
                rule: entry.name,
                formula: if entry.forms.is_empty() {
                    entry.formula.to_string()
                } else {
                    format!("{}\n  {}", entry.formula, entry.forms.join("\n  "))
                },
            })
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExampleProblem {
    pub expression: &'static str,
    /// textbook category the problem illustrates
    pub category: &'static str,
}

pub fn example_problems() -> Vec<ExampleProblem> {
    [
        ("x**2", "Power Rule"),
        ("sin(x)", "Trigonometric"),
        ("exp(x)", "Exponential"),
        ("x*exp(x)", "Integration by Parts"),
        ("x*sin(x)", "Integration by Parts"),
        ("1/x", "Logarithmic"),
        ("2*x + 3", "Basic Linear"),
        ("sin(x)*cos(x)", "Product Rule"),
        ("tan(x)", "Trigonometric"),
    ]
    .into_iter()
    .map(|(expression, category)| ExampleProblem {
        expression,
        category,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedExample {
    #[serde(flatten)]
    pub problem: ExampleProblem,
    pub solution: SolveResult,
}

pub fn run_examples(solver: &IntegralSolver) -> Vec<SolvedExample> {
    example_problems()
        .into_iter()
        .map(|problem| SolvedExample {
            problem,
            solution: solver.solve_integral(problem.expression),
        })
        .collect()
}

#[derive(Tabled)]
struct ExampleRow {
    category: &'static str,
    input: String,
    result: String,
    method: String,
}

/// Solved examples as a terminal table; failed ones show the error instead of a result.
pub fn examples_table(examples: &[SolvedExample]) -> String {
    let rows: Vec<ExampleRow> = examples
        .iter()
        .map(|example| {
            let solution = &example.solution;
            ExampleRow {
                category: example.problem.category,
                input: solution
                    .input
                    .clone()
                    .unwrap_or_else(|| example.problem.expression.to_string()),
                result: solution
                    .result
                    .clone()
                    .or_else(|| solution.error.clone())
                    .unwrap_or_default(),
                method: solution
                    .method
                    .map(|method| method.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    #[test]
    fn test_catalog_shape() {
        let catalog = rule_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog[0].name, "Basic Rules");
        assert_eq!(catalog[0].rules.len(), 4);
        assert_eq!(catalog[1].rules[0].forms.len(), 3);
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json[2]["rules"][0]["formula"], "∫ sin(x) dx = -cos(x) + C");
        // empty form lists are left out
        assert!(json[0]["rules"][0].get("forms").is_none());
    }

    #[test]
    fn test_rules_table_lists_every_rule() {
        let table = rules_table();
        for category in rule_catalog() {
            assert!(table.contains(category.name));
            for entry in category.rules {
                assert!(table.contains(entry.name));
            }
        }
    }

    #[test]
    fn test_all_examples_solve() {
        let solver = IntegralSolver::new();
        let solved = run_examples(&solver);
        assert_eq!(solved.len(), 9);
        for example in &solved {
            assert!(
                example.solution.success,
                "{} failed: {:?}",
                example.problem.expression,
                example.solution.details
            );
        }
        assert_eq!(solved[0].solution.result.as_deref(), Some("x**3/3 + C"));
        assert_eq!(solved[5].solution.result.as_deref(), Some("log(x) + C"));
        assert_eq!(solved[8].solution.result.as_deref(), Some("-log(cos(x)) + C"));
    }

    #[test]
    fn test_example_antiderivatives_differentiate_back() {
        for problem in example_problems() {
            let integrand = Expr::parse_expression(problem.expression).unwrap();
            let antiderivative = integrand.integrate("x").unwrap();
            let (norm, ok) = antiderivative
                .is_antiderivative_of(&integrand, "x", 0.5, 1.5, 50, 1e-4)
                .unwrap();
            assert!(ok, "{}: norm {}", problem.expression, norm);
        }
    }

    #[test]
    fn test_examples_table() {
        let solver = IntegralSolver::new();
        let table = examples_table(&run_examples(&solver));
        assert!(table.contains("∫ x**2 dx"));
        assert!(table.contains("Integration by Parts"));
    }

    /// an integrand for every catalogue rule that states a concrete formula
    fn rule_integrand(category: &str, rule: &str) -> Option<&'static str> {
        let integrand = match (category, rule) {
            ("Basic Rules", "Constant Rule") => "5",
            ("Basic Rules", "Power Rule") => "x**4",
            ("Basic Rules", "Sum Rule") => "x**2 + sin(x)",
            ("Basic Rules", "Difference Rule") => "exp(x) - cos(x)",
            ("Trigonometric Rules", "Sin") => "sin(x)",
            ("Trigonometric Rules", "Cos") => "cos(x)",
            ("Trigonometric Rules", "Tan") => "tan(x)",
            ("Trigonometric Rules", "Sec²") => "sec(x)^2",
            ("Trigonometric Rules", "Sec·Tan") => "sec(x)*tan(x)",
            ("Exponential Rules", "Natural") => "e^x",
            ("Exponential Rules", "General") => "3^x",
            ("Logarithmic Rules", "Natural") => "1/x",
            ("Logarithmic Rules", "General") => "ln(x)",
            ("Product Rule Related", "Example") => "x*sin(x)",
            _ => return None,
        };
        Some(integrand)
    }

    fn assert_solves(solver: &IntegralSolver, input: &str) {
        let solution = solver
            .try_solve(input)
            .unwrap_or_else(|err| panic!("{} failed: {}", input, err));
        let (norm, ok) = solution
            .antiderivative
            .is_antiderivative_of(&solution.expression, "x", 0.5, 1.5, 50, 1e-4)
            .unwrap();
        assert!(ok, "{}: {} (norm {})", input, solution.result_text(), norm);
    }

    #[test]
    fn test_every_catalogue_formula_solves() {
        let solver = IntegralSolver::new();
        for category in rule_catalog() {
            for entry in &category.rules {
                match rule_integrand(category.name, entry.name) {
                    Some(input) => assert_solves(&solver, input),
                    // only the general statements have no integrand of their own
                    None => assert_eq!(entry.name, "Formula", "{} has no integrand", entry.formula),
                }
            }
        }
        // the integration by parts forms: x·eˣ, x·sin(x), x·ln(x)
        for input in ["x*e^x", "x*sin(x)", "x*ln(x)"] {
            assert_solves(&solver, input);
        }
        assert_eq!(
            solver.solve_integral("sec(x)*tan(x)").result.as_deref(),
            Some("1/cos(x) + C")
        );
    }
}
