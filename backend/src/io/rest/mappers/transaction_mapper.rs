use crate::domain::commands::transactions::{
    CreateTransactionCommand, TransactionListQuery as DomainListQuery, UpdateTransactionCommand,
};
use crate::domain::models::transaction::Transaction as DomainTransaction;
use shared::{
    CreateTransactionRequest, Transaction as SharedTransaction, TransactionListQuery,
    UpdateTransactionRequest,
};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            pay_period_id: domain.pay_period_id,
            budget_category_id: domain.budget_category_id,
            amount: domain.amount,
            description: domain.description,
            transaction_date: domain.transaction_date,
            source: domain.source,
            created_at: domain.created_at,
        }
    }

    pub fn to_create_command(request: CreateTransactionRequest) -> CreateTransactionCommand {
        CreateTransactionCommand {
            budget_category_id: request.budget_category_id,
            amount: request.amount,
            description: request.description,
            transaction_date: request.transaction_date,
            source: request.source,
        }
    }

    pub fn to_update_command(request: UpdateTransactionRequest) -> UpdateTransactionCommand {
        UpdateTransactionCommand {
            description: request.description,
            amount: request.amount,
        }
    }

    pub fn to_list_query(query: TransactionListQuery) -> DomainListQuery {
        DomainListQuery {
            pay_period_id: query.pay_period_id,
            category_id: query.category_id,
            limit: query.limit,
            offset: query.offset,
        }
    }
}
