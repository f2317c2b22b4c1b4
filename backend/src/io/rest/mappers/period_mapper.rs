use super::category_mapper::CategoryMapper;
use crate::domain::commands::periods::{CreatePeriodCommand, PeriodListQuery, UpdatePeriodCommand};
use crate::domain::models::pay_period::PayPeriodDetails;
use shared::{
    CreatePayPeriodRequest, PayPeriod as SharedPayPeriod, PayPeriodListQuery,
    UpdatePayPeriodRequest,
};

pub struct PeriodMapper;

impl PeriodMapper {
    pub fn to_dto(details: PayPeriodDetails) -> SharedPayPeriod {
        let PayPeriodDetails { period, categories } = details;
        SharedPayPeriod {
            id: period.id,
            user_id: period.user_id,
            start_date: period.start_date,
            end_date: period.end_date,
            frequency: period.frequency,
            total_income: period.total_income,
            status: period.status,
            created_at: period.created_at,
            budget_categories: categories.into_iter().map(CategoryMapper::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreatePayPeriodRequest) -> CreatePeriodCommand {
        CreatePeriodCommand {
            start_date: request.start_date,
            frequency: request.frequency,
            total_income: request.total_income,
            categories: request
                .budget_categories
                .into_iter()
                .map(CategoryMapper::to_spec)
                .collect(),
        }
    }

    pub fn to_update_command(request: UpdatePayPeriodRequest) -> UpdatePeriodCommand {
        UpdatePeriodCommand {
            status: request.status,
            total_income: request.total_income,
        }
    }

    pub fn to_list_query(query: PayPeriodListQuery) -> PeriodListQuery {
        PeriodListQuery {
            status: query.status_filter,
        }
    }
}
