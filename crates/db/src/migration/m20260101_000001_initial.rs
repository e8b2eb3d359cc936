//! Initial database migration.
//!
//! Creates the input catalog and the quotation tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CATALOG
        // ============================================================
        db.execute_unprepared(INPUTS_SQL).await?;

        // ============================================================
        // PART 2: QUOTATIONS
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(QUOTATION_ITEMS_SQL).await?;
        db.execute_unprepared(QUOTATION_ITEM_DETAILS_SQL).await?;

        // ============================================================
        // PART 3: PRICING CONFIGURATION (1:1 with quotations)
        // ============================================================
        db.execute_unprepared(QUOTATION_PERCENTAGES_SQL).await?;
        db.execute_unprepared(QUOTATION_ADDITIONAL_COSTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const INPUTS_SQL: &str = r"
CREATE TABLE inputs (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    unit VARCHAR(50),
    cost NUMERIC(19, 4) NOT NULL CHECK (cost >= 0),
    performance NUMERIC(19, 4) NOT NULL CHECK (performance > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    client VARCHAR(255),
    builder VARCHAR(255),
    responsible_employee_id INTEGER,
    status_id INTEGER,
    consecutive_code VARCHAR(50) UNIQUE,
    total_cost NUMERIC(19, 4),
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quotations_live ON quotations(id) WHERE deleted_at IS NULL;
";

const QUOTATION_ITEMS_SQL: &str = r"
CREATE TABLE quotation_items (
    id SERIAL PRIMARY KEY,
    quotation_id INTEGER NOT NULL REFERENCES quotations(id) ON DELETE CASCADE,
    item VARCHAR(500) NOT NULL,
    technical_specification TEXT,
    unit_of_measure VARCHAR(50),
    quantity NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    unit_price NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (unit_price >= 0),
    total NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quotation_items_quotation ON quotation_items(quotation_id);
";

const QUOTATION_ITEM_DETAILS_SQL: &str = r"
CREATE TABLE quotation_item_details (
    id SERIAL PRIMARY KEY,
    quotation_item_id INTEGER NOT NULL REFERENCES quotation_items(id) ON DELETE CASCADE,
    input_id INTEGER NOT NULL REFERENCES inputs(id),
    quantity NUMERIC(19, 4) NOT NULL DEFAULT 0,
    performance NUMERIC(19, 4) NOT NULL,
    unit_cost NUMERIC(19, 4) NOT NULL CHECK (unit_cost >= 0),
    total_cost NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quotation_item_details_item ON quotation_item_details(quotation_item_id);
";

const QUOTATION_PERCENTAGES_SQL: &str = r"
CREATE TABLE quotation_percentages (
    id SERIAL PRIMARY KEY,
    quotation_id INTEGER NOT NULL UNIQUE REFERENCES quotations(id) ON DELETE CASCADE,
    administration NUMERIC(9, 6) CHECK (administration >= 0),
    unforeseen NUMERIC(9, 6) CHECK (unforeseen >= 0),
    utility NUMERIC(9, 6) CHECK (utility >= 0),
    vat NUMERIC(9, 6) CHECK (vat >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const QUOTATION_ADDITIONAL_COSTS_SQL: &str = r"
CREATE TABLE quotation_additional_costs (
    id SERIAL PRIMARY KEY,
    quotation_id INTEGER NOT NULL UNIQUE REFERENCES quotations(id) ON DELETE CASCADE,
    per_diem NUMERIC(19, 4) CHECK (per_diem >= 0),
    siso_value NUMERIC(19, 4) CHECK (siso_value >= 0),
    tax NUMERIC(9, 6) CHECK (tax >= 0),
    commission NUMERIC(9, 6) CHECK (commission >= 0),
    petty_cash NUMERIC(9, 6) CHECK (petty_cash >= 0),
    policy NUMERIC(9, 6) CHECK (policy >= 0),
    utility NUMERIC(9, 6) CHECK (utility >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS quotation_additional_costs;
DROP TABLE IF EXISTS quotation_percentages;
DROP TABLE IF EXISTS quotation_item_details;
DROP TABLE IF EXISTS quotation_items;
DROP TABLE IF EXISTS quotations;
DROP TABLE IF EXISTS inputs;
";
