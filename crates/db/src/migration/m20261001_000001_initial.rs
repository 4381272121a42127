//! Initial schema: identity registry and the ledger tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(INVESTMENTS_SQL).await?;
        db.execute_unprepared(WITHDRAWALS_SQL).await?;
        db.execute_unprepared(RESULT_LEDGER_SQL).await?;
        db.execute_unprepared(DISTRIBUTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE investment_status AS ENUM ('PENDING', 'APPROVED', 'REJECTED');
CREATE TYPE withdrawal_type AS ENUM ('CAPITAL_REDEMPTION', 'RESULT_SETTLEMENT');
CREATE TYPE withdrawal_status AS ENUM ('PENDING', 'APPROVED', 'REJECTED', 'PAID');
";

const USERS_SQL: &str = r"
-- Identity registry, populated from the identity provider
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(150) NOT NULL UNIQUE,
    email VARCHAR(254) NOT NULL DEFAULT '',
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_admin ON users(id) WHERE is_admin;
";

const INVESTMENTS_SQL: &str = r"
CREATE TABLE investments (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    amount_cents BIGINT NOT NULL,
    status investment_status NOT NULL DEFAULT 'PENDING',
    paid_at TIMESTAMPTZ,
    external_ref VARCHAR(80),
    reviewed_by UUID REFERENCES users(id),
    reviewed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_investments_amount_positive CHECK (amount_cents > 0)
);

CREATE INDEX idx_investments_user_status ON investments(user_id, status);
CREATE INDEX idx_investments_user_created ON investments(user_id, created_at DESC);
CREATE INDEX idx_investments_status_created ON investments(status, created_at DESC);
";

const WITHDRAWALS_SQL: &str = r"
CREATE TABLE withdrawal_requests (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    withdrawal_type withdrawal_type NOT NULL,
    amount_cents BIGINT NOT NULL,
    pix_key VARCHAR(140) NOT NULL DEFAULT '',
    scheduled_for DATE,
    status withdrawal_status NOT NULL DEFAULT 'PENDING',
    rejection_reason VARCHAR(255),
    admin_note TEXT,
    external_ref VARCHAR(80),
    requested_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    approved_at TIMESTAMPTZ,
    paid_at TIMESTAMPTZ,
    processed_by UUID REFERENCES users(id),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_withdrawal_amount_positive CHECK (amount_cents > 0),
    CONSTRAINT chk_capital_redemption_scheduled CHECK (
        withdrawal_type <> 'CAPITAL_REDEMPTION' OR scheduled_for IS NOT NULL
    )
);

CREATE INDEX idx_withdrawals_user_status ON withdrawal_requests(user_id, status);
CREATE INDEX idx_withdrawals_user_type_status
    ON withdrawal_requests(user_id, withdrawal_type, status);
CREATE INDEX idx_withdrawals_user_type_scheduled
    ON withdrawal_requests(user_id, withdrawal_type, scheduled_for);
CREATE INDEX idx_withdrawals_user_requested ON withdrawal_requests(user_id, requested_at DESC);
CREATE INDEX idx_withdrawals_status_requested ON withdrawal_requests(status, requested_at DESC);
";

const RESULT_LEDGER_SQL: &str = r"
-- Append-only; corrections are new entries
CREATE TABLE result_ledger_entries (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    amount_cents BIGINT NOT NULL,
    description VARCHAR(255) NOT NULL DEFAULT '',
    external_ref VARCHAR(80) NOT NULL DEFAULT '',
    run_id UUID,
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_result_entry_nonzero CHECK (amount_cents <> 0),
    -- One entry per distribution run; manual entries carry a NULL run_id
    CONSTRAINT uq_result_entry_run UNIQUE (user_id, external_ref, run_id)
);

CREATE INDEX idx_result_entries_user_created ON result_ledger_entries(user_id, created_at);
CREATE INDEX idx_result_entries_ref ON result_ledger_entries(external_ref);
";

const DISTRIBUTIONS_SQL: &str = r"
CREATE TABLE daily_performance_distributions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    reference_date DATE NOT NULL,
    performance_percent NUMERIC(7, 4) NOT NULL,
    base_capital_cents BIGINT NOT NULL,
    result_cents BIGINT NOT NULL,
    note VARCHAR(255) NOT NULL DEFAULT '',
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_distribution_user_date UNIQUE (user_id, reference_date)
);

CREATE INDEX idx_distributions_date ON daily_performance_distributions(reference_date);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS daily_performance_distributions CASCADE;
DROP TABLE IF EXISTS result_ledger_entries CASCADE;
DROP TABLE IF EXISTS withdrawal_requests CASCADE;
DROP TABLE IF EXISTS investments CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS withdrawal_status;
DROP TYPE IF EXISTS withdrawal_type;
DROP TYPE IF EXISTS investment_status;
";
