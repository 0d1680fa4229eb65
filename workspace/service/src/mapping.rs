//! Entity to DTO conversions.

use common::{
    FarmerDto, FarmerSummaryDto, MessageDto, MessageSummaryDto, ProductDto, ProductSummaryDto,
    RegistrationRequestDto, UserDto,
};
use model::entities::{product, registration_request, user};

use crate::category::category_color;
use crate::repository::farmer::FarmerRecord;
use crate::repository::message::MessageRecord;
use crate::repository::product::ProductRecord;

/// Products shown inline on a farmer profile.
pub const RECENT_PRODUCTS_LIMIT: usize = 5;

pub fn user_dto(user: &user::Model) -> UserDto {
    UserDto {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.full_name(),
        phone_number: user.phone_number.clone(),
        role: user.role.to_string(),
        is_active: user.is_active,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    }
}

pub fn product_summary(product: &product::Model) -> ProductSummaryDto {
    ProductSummaryDto {
        id: product.id,
        name: product.name.clone(),
        category: product.category.clone(),
        production_date: product.production_date,
        is_active: product.is_active,
    }
}

/// Expects `record.products` newest first, as the farmer repository loads them.
pub fn farmer_dto(record: &FarmerRecord) -> FarmerDto {
    FarmerDto {
        id: record.farmer.id,
        farm_name: record.farmer.farm_name.clone(),
        location: record.farmer.location.clone(),
        user_id: record.user.id,
        username: record.user.username.clone(),
        first_name: record.user.first_name.clone(),
        last_name: record.user.last_name.clone(),
        email: record.user.email.clone(),
        phone_number: record.user.phone_number.clone(),
        joined_at: record.user.created_at,
        product_count: record.products.len() as u64,
        is_active: record.user.is_active,
        recent_products: record
            .products
            .iter()
            .take(RECENT_PRODUCTS_LIMIT)
            .map(product_summary)
            .collect(),
    }
}

pub fn farmer_summary(record: &FarmerRecord) -> FarmerSummaryDto {
    FarmerSummaryDto {
        id: record.farmer.id,
        farm_name: record.farmer.farm_name.clone(),
        location: record.farmer.location.clone(),
        owner_name: record.user.full_name(),
        product_count: record.products.len() as u64,
        is_active: record.user.is_active,
        joined_at: record.user.created_at,
    }
}

pub fn product_dto(record: &ProductRecord) -> ProductDto {
    let product = &record.product;
    ProductDto {
        id: product.id,
        name: product.name.clone(),
        category: product.category.clone(),
        category_color: category_color(&product.category).to_string(),
        production_date: product.production_date,
        description: product.description.clone(),
        farmer_id: product.farmer_id,
        farmer_name: record.owner.full_name(),
        farm_name: record.farmer.farm_name.clone(),
        created_at: product.created_at,
        is_active: product.is_active,
    }
}

pub fn message_dto(record: &MessageRecord) -> MessageDto {
    let message = &record.message;
    MessageDto {
        id: message.id,
        subject: message.subject.clone(),
        content: message.content.clone(),
        sender_id: message.sender_id,
        sender_name: record.sender.full_name(),
        sender_role: record.sender.role.to_string(),
        recipient_id: message.recipient_id,
        recipient_name: record.recipient.full_name(),
        recipient_role: record.recipient.role.to_string(),
        sent_at: message.sent_at,
        read_at: message.read_at,
        is_read: message.is_read(),
    }
}

pub fn message_summary(record: &MessageRecord) -> MessageSummaryDto {
    let message = &record.message;
    MessageSummaryDto {
        id: message.id,
        subject: message.subject.clone(),
        sender_id: message.sender_id,
        sender_name: record.sender.full_name(),
        recipient_id: message.recipient_id,
        recipient_name: record.recipient.full_name(),
        sent_at: message.sent_at,
        is_read: message.is_read(),
    }
}

pub fn registration_request_dto(request: &registration_request::Model) -> RegistrationRequestDto {
    RegistrationRequestDto {
        id: request.id,
        username: request.username.clone(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        phone_number: request.phone_number.clone(),
        farm_name: request.farm_name.clone(),
        location: request.location.clone(),
        requested_at: request.requested_at,
        status: request.status.to_string(),
        rejection_reason: request.rejection_reason.clone(),
    }
}
