//! `PostgreSQL` repository implementation for work-order storage.

use super::{
    models::{WorkOrderRecord, WorkOrderRow},
    schema::work_orders,
};
use crate::workorder::{
    domain::{
        AttachmentRef, OperatorId, PersistedWorkOrder, ReasonMode, WorkOrder, WorkOrderId,
        WorkOrderState,
    },
    ports::{WorkOrderRepository, WorkOrderRepositoryError, WorkOrderRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by work-order adapters.
pub type WorkOrderPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed work-order repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkOrderRepository {
    pool: WorkOrderPgPool,
}

impl PostgresWorkOrderRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkOrderPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkOrderRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkOrderRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkOrderRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkOrderRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkOrderRepository for PostgresWorkOrderRepository {
    async fn store(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()> {
        order.check_write_invariants()?;
        let order_id = order.id();
        let record = to_record(order)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(work_orders::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkOrderRepositoryError::Duplicate(order_id)
                    }
                    _ => WorkOrderRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()> {
        order.check_write_invariants()?;
        let order_id = order.id();
        let record = to_record(order)?;

        self.run_blocking(move |connection| {
            let affected =
                diesel::update(work_orders::table.filter(work_orders::id.eq(order_id.into_inner())))
                    .set(&record)
                    .execute(connection)
                    .map_err(WorkOrderRepositoryError::persistence)?;
            if affected == 0 {
                return Err(WorkOrderRepositoryError::NotFound(order_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: WorkOrderId) -> WorkOrderRepositoryResult<Option<WorkOrder>> {
        self.run_blocking(move |connection| {
            let row = work_orders::table
                .filter(work_orders::id.eq(id.into_inner()))
                .select(WorkOrderRow::as_select())
                .first::<WorkOrderRow>(connection)
                .optional()
                .map_err(WorkOrderRepositoryError::persistence)?;
            row.map(row_to_order).transpose()
        })
        .await
    }

    async fn list_by_state(
        &self,
        state: WorkOrderState,
    ) -> WorkOrderRepositoryResult<Vec<WorkOrder>> {
        self.run_blocking(move |connection| {
            let rows = work_orders::table
                .filter(work_orders::state.eq(state.as_str()))
                .select(WorkOrderRow::as_select())
                .load::<WorkOrderRow>(connection)
                .map_err(WorkOrderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_order).collect()
        })
        .await
    }

    async fn find_by_operator_in_state(
        &self,
        operator: OperatorId,
        state: WorkOrderState,
    ) -> WorkOrderRepositoryResult<Vec<WorkOrder>> {
        self.run_blocking(move |connection| {
            let rows = work_orders::table
                .filter(work_orders::operator_id.eq(operator.into_inner()))
                .filter(work_orders::state.eq(state.as_str()))
                .select(WorkOrderRow::as_select())
                .load::<WorkOrderRow>(connection)
                .map_err(WorkOrderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_order).collect()
        })
        .await
    }
}

fn to_record(order: &WorkOrder) -> WorkOrderRepositoryResult<WorkOrderRecord> {
    let attachments = serde_json::to_value(order.attachments())
        .map_err(WorkOrderRepositoryError::persistence)?;

    Ok(WorkOrderRecord {
        id: order.id().into_inner(),
        name: order.name().to_owned(),
        state: order.state().as_str().to_owned(),
        operator_id: order.operator().map(OperatorId::into_inner),
        started_at: order.started_at(),
        finished_at: order.finished_at(),
        planned_start: order.planned_start(),
        planned_end: order.planned_end(),
        quantity: i64::from(order.quantity()),
        scrap_reason: order.scrap_reason().map(str::to_owned),
        fail_reason: order.fail_reason().map(str::to_owned),
        pending_reason: order.pending_reason().map(|mode| mode.as_str().to_owned()),
        attachments,
        created_at: order.created_at(),
        updated_at: order.updated_at(),
    })
}

fn row_to_order(row: WorkOrderRow) -> WorkOrderRepositoryResult<WorkOrder> {
    let state = WorkOrderState::try_from(row.state.as_str())
        .map_err(WorkOrderRepositoryError::persistence)?;
    let pending_reason = row
        .pending_reason
        .as_deref()
        .map(ReasonMode::try_from)
        .transpose()
        .map_err(WorkOrderRepositoryError::persistence)?;
    let attachments = serde_json::from_value::<Vec<AttachmentRef>>(row.attachments)
        .map_err(WorkOrderRepositoryError::persistence)?;
    let quantity =
        u32::try_from(row.quantity).map_err(WorkOrderRepositoryError::persistence)?;

    let data = PersistedWorkOrder {
        id: WorkOrderId::from_uuid(row.id),
        name: row.name,
        state,
        operator: row.operator_id.map(OperatorId::from_uuid),
        started_at: row.started_at,
        finished_at: row.finished_at,
        planned_start: row.planned_start,
        planned_end: row.planned_end,
        quantity,
        scrap_reason: row.scrap_reason,
        fail_reason: row.fail_reason,
        pending_reason,
        attachments,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(WorkOrder::from_persisted(data))
}
