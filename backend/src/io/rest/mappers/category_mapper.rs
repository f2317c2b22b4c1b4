use crate::domain::commands::allocations::{AllocateCommand, CategorySpec};
use crate::domain::models::budget_category::BudgetCategory as DomainCategory;
use shared::{
    AllocateBudgetRequest, BudgetCategory as SharedCategory, CategoryAllocation,
};

pub struct CategoryMapper;

impl CategoryMapper {
    pub fn to_dto(domain: DomainCategory) -> SharedCategory {
        SharedCategory {
            id: domain.id,
            pay_period_id: domain.pay_period_id,
            name: domain.name,
            allocated_amount: domain.allocated_amount,
            remaining_amount: domain.remaining_amount,
            version: domain.version,
            created_at: domain.created_at,
        }
    }

    pub fn to_spec(dto: CategoryAllocation) -> CategorySpec {
        CategorySpec {
            name: dto.name,
            allocated_amount: dto.allocated_amount,
        }
    }

    pub fn to_allocate_command(request: AllocateBudgetRequest) -> AllocateCommand {
        AllocateCommand {
            pay_period_id: request.pay_period_id,
            allocations: request.allocations.into_iter().map(Self::to_spec).collect(),
        }
    }
}
