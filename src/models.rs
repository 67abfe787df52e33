//! Input records for a shop investment plan

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unknown field '{0}' (run 'fields' to list valid keys)")]
    UnknownField(String),

    #[error("plan '{0}' not found")]
    PlanNotFound(String),
}

/// One-off costs of opening the shop, as raw text exactly as entered.
///
/// Empty string means "not filled in yet"; numeric meaning is assigned
/// by coercion at computation time, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupCosts {
    pub transfer_fee: String,
    pub rent_deposit: String,
    pub tech_fee: String,
    pub decoration: String,
    pub ad: String,
    pub equipment: String,
    pub first_materials: String,
    pub three_month_rent: String,
    pub salary: String,
    pub marketing: String,
    pub reserve: String,
}

/// Per-unit pricing inputs for the gross margin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginInputs {
    pub price: String,
    pub food_cost: String,
    pub packaging: String,
}

/// Daily operating costs for the break-even point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakEvenInputs {
    pub daily_rent: String,
    pub daily_salary: String,
    pub energy: String,
    pub other: String,
}

/// A named investment plan: the full mutable input snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub name: String,
    pub costs: StartupCosts,
    pub margin: MarginInputs,
    pub break_even: BreakEvenInputs,
    pub monthly_profit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Startup,
    Margin,
    BreakEven,
    Payback,
}

impl FieldGroup {
    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::Startup => "Startup costs",
            FieldGroup::Margin => "Unit margin",
            FieldGroup::BreakEven => "Daily break-even",
            FieldGroup::Payback => "Payback",
        }
    }
}

pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub group: FieldGroup,
}

/// Every editable field, in display order
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { key: "transfer-fee", label: "Transfer fee", group: FieldGroup::Startup },
    FieldSpec { key: "rent-deposit", label: "Rent deposit", group: FieldGroup::Startup },
    FieldSpec { key: "tech-fee", label: "Technology/training fee", group: FieldGroup::Startup },
    FieldSpec { key: "decoration", label: "Decoration", group: FieldGroup::Startup },
    FieldSpec { key: "ad", label: "Advertising", group: FieldGroup::Startup },
    FieldSpec { key: "equipment", label: "Equipment", group: FieldGroup::Startup },
    FieldSpec { key: "first-materials", label: "First-batch materials", group: FieldGroup::Startup },
    FieldSpec { key: "three-month-rent", label: "Three months of rent", group: FieldGroup::Startup },
    FieldSpec { key: "salary", label: "Staff salary", group: FieldGroup::Startup },
    FieldSpec { key: "marketing", label: "Marketing", group: FieldGroup::Startup },
    FieldSpec { key: "reserve", label: "Reserve fund", group: FieldGroup::Startup },
    FieldSpec { key: "price", label: "Unit price", group: FieldGroup::Margin },
    FieldSpec { key: "food-cost", label: "Food cost per unit", group: FieldGroup::Margin },
    FieldSpec { key: "packaging", label: "Packaging per unit", group: FieldGroup::Margin },
    FieldSpec { key: "daily-rent", label: "Rent per day", group: FieldGroup::BreakEven },
    FieldSpec { key: "daily-salary", label: "Salary per day", group: FieldGroup::BreakEven },
    FieldSpec { key: "energy", label: "Energy per day", group: FieldGroup::BreakEven },
    FieldSpec { key: "other", label: "Other costs per day", group: FieldGroup::BreakEven },
    FieldSpec { key: "monthly-profit", label: "Estimated monthly net profit", group: FieldGroup::Payback },
];

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Plan {
            name: name.into(),
            ..Plan::default()
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "transfer-fee" => &mut self.costs.transfer_fee,
            "rent-deposit" => &mut self.costs.rent_deposit,
            "tech-fee" => &mut self.costs.tech_fee,
            "decoration" => &mut self.costs.decoration,
            "ad" => &mut self.costs.ad,
            "equipment" => &mut self.costs.equipment,
            "first-materials" => &mut self.costs.first_materials,
            "three-month-rent" => &mut self.costs.three_month_rent,
            "salary" => &mut self.costs.salary,
            "marketing" => &mut self.costs.marketing,
            "reserve" => &mut self.costs.reserve,
            "price" => &mut self.margin.price,
            "food-cost" => &mut self.margin.food_cost,
            "packaging" => &mut self.margin.packaging,
            "daily-rent" => &mut self.break_even.daily_rent,
            "daily-salary" => &mut self.break_even.daily_salary,
            "energy" => &mut self.break_even.energy,
            "other" => &mut self.break_even.other,
            "monthly-profit" => &mut self.monthly_profit,
            _ => return None,
        })
    }

    /// Set the raw text of a field. Any text is accepted; only the field
    /// key is validated.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<(), PlanError> {
        match self.slot(key) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(PlanError::UnknownField(key.to_string())),
        }
    }

    /// Raw text of a field as stored
    pub fn field(&self, key: &str) -> Result<&str, PlanError> {
        match key {
            "transfer-fee" => Ok(&self.costs.transfer_fee),
            "rent-deposit" => Ok(&self.costs.rent_deposit),
            "tech-fee" => Ok(&self.costs.tech_fee),
            "decoration" => Ok(&self.costs.decoration),
            "ad" => Ok(&self.costs.ad),
            "equipment" => Ok(&self.costs.equipment),
            "first-materials" => Ok(&self.costs.first_materials),
            "three-month-rent" => Ok(&self.costs.three_month_rent),
            "salary" => Ok(&self.costs.salary),
            "marketing" => Ok(&self.costs.marketing),
            "reserve" => Ok(&self.costs.reserve),
            "price" => Ok(&self.margin.price),
            "food-cost" => Ok(&self.margin.food_cost),
            "packaging" => Ok(&self.margin.packaging),
            "daily-rent" => Ok(&self.break_even.daily_rent),
            "daily-salary" => Ok(&self.break_even.daily_salary),
            "energy" => Ok(&self.break_even.energy),
            "other" => Ok(&self.break_even.other),
            "monthly-profit" => Ok(&self.monthly_profit),
            _ => Err(PlanError::UnknownField(key.to_string())),
        }
    }
}
