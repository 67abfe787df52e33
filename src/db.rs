//! Database schema and operations

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{Plan, PlanError, FIELDS};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Named investment plans
        CREATE TABLE IF NOT EXISTS plans (
            name TEXT PRIMARY KEY
        );

        -- Raw field text per plan, exactly as the user entered it.
        -- Missing rows read back as the empty-string default.
        CREATE TABLE IF NOT EXISTS plan_fields (
            plan_name TEXT NOT NULL,
            field TEXT NOT NULL,
            raw_value TEXT NOT NULL,
            PRIMARY KEY (plan_name, field)
        );
        "#,
    )?;
    Ok(())
}

pub fn plan_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM plans WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Create a plan with every field at its empty default
pub fn create_plan(conn: &Connection, name: &str) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO plans (name) VALUES (?1)", [name])?;
    Ok(())
}

/// Store the raw text of one field
pub fn set_field(conn: &Connection, plan_name: &str, field: &str, raw_value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO plan_fields (plan_name, field, raw_value)
         VALUES (?1, ?2, ?3)",
        (plan_name, field, raw_value),
    )?;
    Ok(())
}

/// Store every field of a plan, creating the plan row if needed
pub fn save_plan(conn: &Connection, plan: &Plan) -> Result<()> {
    create_plan(conn, &plan.name)?;
    for spec in FIELDS {
        let raw = plan.field(spec.key)?;
        set_field(conn, &plan.name, spec.key, raw)?;
    }
    Ok(())
}

/// Load a plan's raw field text; fields with no stored row stay at the
/// empty default
pub fn load_plan(conn: &Connection, name: &str) -> Result<Plan> {
    if !plan_exists(conn, name)? {
        return Err(PlanError::PlanNotFound(name.to_string()).into());
    }

    let mut plan = Plan::new(name);

    let mut stmt = conn.prepare(
        "SELECT field, raw_value FROM plan_fields WHERE plan_name = ?1",
    )?;
    let rows = stmt.query_map([name], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    for row in rows {
        let (field, raw_value) = row?;
        plan.set_field(&field, raw_value)?;
    }

    Ok(plan)
}

/// List all plan names
pub fn list_plans(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM plans ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Reset every field of a plan to the empty default
pub fn clear_plan(conn: &Connection, name: &str) -> Result<()> {
    if !plan_exists(conn, name)? {
        return Err(PlanError::PlanNotFound(name.to_string()).into());
    }
    conn.execute("DELETE FROM plan_fields WHERE plan_name = ?1", [name])?;
    Ok(())
}

/// Delete a plan and all of its fields
pub fn remove_plan(conn: &Connection, name: &str) -> Result<()> {
    if !plan_exists(conn, name)? {
        return Err(PlanError::PlanNotFound(name.to_string()).into());
    }
    conn.execute("DELETE FROM plan_fields WHERE plan_name = ?1", [name])?;
    conn.execute("DELETE FROM plans WHERE name = ?1", [name])?;
    Ok(())
}
