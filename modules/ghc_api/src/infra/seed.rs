//! Demo records for local runs: one move with orders, two shipments, a
//! pending SIT extension, a payment service item and an uploaded document.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use super::storage::LocalFileStorer;
use super::store::InMemoryStore;
use crate::api::rest::dto::AV_STATUS_TAG;
use crate::contract::model::{
    Address, Customer, CurrentSit, Document, DutyLocation, Entitlement, Move, MoveStatus,
    MtoShipment, ObjectTags, OfficeUserRef, Order, OrdersType, PaymentServiceItem,
    PaymentServiceItemStatus, ShipmentStatus, ShipmentType, SitExtension, SitExtensionStatus,
    SitStatus, Upload, UploadType,
};

pub const DEMO_LOCATOR: &str = "DEMO1234";
pub const DEMO_MOVE_ID: Uuid = Uuid::from_u128(0x6d6f_7665_0000_4000_8000_0000_0000_0001);
pub const DEMO_ORDER_ID: Uuid = Uuid::from_u128(0x6f72_6465_0000_4000_8000_0000_0000_0001);
pub const DEMO_CUSTOMER_ID: Uuid = Uuid::from_u128(0x6375_7374_0000_4000_8000_0000_0000_0001);
pub const DEMO_SUBMITTED_SHIPMENT_ID: Uuid =
    Uuid::from_u128(0x7368_6970_0000_4000_8000_0000_0000_0001);
pub const DEMO_APPROVED_SHIPMENT_ID: Uuid =
    Uuid::from_u128(0x7368_6970_0000_4000_8000_0000_0000_0002);
pub const DEMO_SIT_EXTENSION_ID: Uuid = Uuid::from_u128(0x7369_7465_0000_4000_8000_0000_0000_0001);
pub const DEMO_PAYMENT_SERVICE_ITEM_ID: Uuid =
    Uuid::from_u128(0x7073_6900_0000_4000_8000_0000_0000_0001);
pub const DEMO_DOCUMENT_ID: Uuid = Uuid::from_u128(0x646f_6375_0000_4000_8000_0000_0000_0001);
pub const DEMO_UPLOAD_ID: Uuid = Uuid::from_u128(0x7570_6c64_0000_4000_8000_0000_0000_0001);
pub const DEMO_CLOSEOUT_OFFICE_ID: Uuid =
    Uuid::from_u128(0x6f66_6669_0000_4000_8000_0000_0000_0001);
pub const DEMO_OFFICE_USER_ID: Uuid = Uuid::from_u128(0x6f75_7365_0000_4000_8000_0000_0000_0001);

fn address(street: &str, city: &str, state: &str, zip: &str) -> Address {
    Address {
        id: Uuid::new_v4(),
        street_address1: street.to_string(),
        street_address2: None,
        street_address3: None,
        city: city.to_string(),
        state: state.to_string(),
        postal_code: zip.to_string(),
        country: Some("US".to_string()),
        updated_at: Utc::now(),
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn shipment(id: Uuid, status: ShipmentStatus, created_at: DateTime<Utc>) -> MtoShipment {
    MtoShipment {
        id,
        move_task_order_id: DEMO_MOVE_ID,
        shipment_type: ShipmentType::Hhg,
        status,
        shipment_locator: None,
        requested_pickup_date: date(2025, 6, 2),
        requested_delivery_date: date(2025, 6, 20),
        scheduled_pickup_date: None,
        scheduled_delivery_date: None,
        actual_pickup_date: None,
        actual_delivery_date: None,
        approved_date: None,
        pickup_address: Some(address("123 Any St", "Beverly Hills", "CA", "90210")),
        destination_address: Some(address("7 Fort Rd", "Fort Gordon", "GA", "30813")),
        secondary_pickup_address: None,
        secondary_delivery_address: None,
        customer_remarks: None,
        counselor_remarks: None,
        rejection_reason: None,
        diversion: false,
        diversion_reason: None,
        prime_estimated_weight: Some(4000),
        prime_actual_weight: None,
        billable_weight_cap: None,
        billable_weight_justification: None,
        sit_days_allowance: Some(90),
        sit_extensions: Vec::new(),
        reweigh: None,
        created_at,
        updated_at: created_at,
    }
}

/// Populate `store` with the demo move and tag its uploads in `storer`.
pub fn demo_data(store: &InMemoryStore, storer: &LocalFileStorer) {
    let now = Utc::now();
    let mut t = store.write();

    t.customers.insert(
        DEMO_CUSTOMER_ID,
        Customer {
            id: DEMO_CUSTOMER_ID,
            user_id: Uuid::new_v4(),
            first_name: "Jordan".into(),
            middle_name: None,
            last_name: "Rivera".into(),
            suffix: None,
            affiliation: Some("ARMY".into()),
            edipi: Some("1234567890".into()),
            emplid: None,
            personal_email: Some("jordan.rivera@example.com".into()),
            telephone: Some("555-555-0100".into()),
            secondary_telephone: None,
            phone_is_preferred: true,
            email_is_preferred: false,
            residential_address: Some(address("123 Any St", "Beverly Hills", "CA", "90210")),
            backup_mailing_address: None,
            cac_validated: true,
            created_at: now,
            updated_at: now,
        },
    );

    t.orders.insert(
        DEMO_ORDER_ID,
        Order {
            id: DEMO_ORDER_ID,
            customer_id: DEMO_CUSTOMER_ID,
            customer: None,
            orders_number: Some("ORD-0001".into()),
            orders_type: OrdersType::PermanentChangeOfStation,
            orders_type_detail: None,
            grade: Some("E_4".into()),
            issue_date: date(2025, 5, 1).unwrap_or_default(),
            report_by_date: date(2025, 7, 1).unwrap_or_default(),
            department_indicator: Some("ARMY".into()),
            tac: Some("F8E1".into()),
            sac: None,
            nts_tac: None,
            nts_sac: None,
            origin_duty_location: Some(DutyLocation {
                id: Uuid::new_v4(),
                name: "Fort Liberty".into(),
                address: address("1 Main Post", "Fayetteville", "NC", "28310"),
            }),
            new_duty_location: DutyLocation {
                id: Uuid::new_v4(),
                name: "Fort Gordon".into(),
                address: address("7 Fort Rd", "Fort Gordon", "GA", "30813"),
            },
            entitlement: Some(Entitlement {
                id: Uuid::new_v4(),
                authorized_weight: Some(7000),
                dependents_authorized: Some(true),
                non_temporary_storage: Some(false),
                privately_owned_vehicle: Some(true),
                pro_gear_weight: 2000,
                pro_gear_weight_spouse: 500,
                required_medical_equipment_weight: 0,
                organizational_clothing_and_individual_equipment: true,
                gun_safe: false,
                storage_in_transit: Some(90),
                updated_at: now,
            }),
            move_code: None,
            move_task_order_id: None,
            amended_orders_acknowledged_at: None,
            created_at: now,
            updated_at: now,
        },
    );

    let upload_key = format!("customer/{DEMO_CUSTOMER_ID}/orders.pdf");
    t.documents.insert(
        DEMO_DOCUMENT_ID,
        Document {
            id: DEMO_DOCUMENT_ID,
            service_member_id: DEMO_CUSTOMER_ID,
            uploads: vec![Upload {
                id: DEMO_UPLOAD_ID,
                filename: "orders.pdf".into(),
                content_type: "application/pdf".into(),
                upload_type: UploadType::User,
                bytes: 48_213,
                rotation: None,
                storage_key: upload_key.clone(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }],
        },
    );
    storer.set_tags(
        upload_key,
        ObjectTags::from([(AV_STATUS_TAG.to_string(), "CLEAN".to_string())]),
    );

    t.moves.insert(
        DEMO_MOVE_ID,
        Move {
            id: DEMO_MOVE_ID,
            locator: DEMO_LOCATOR.into(),
            status: MoveStatus::ApprovalsRequested,
            orders_id: DEMO_ORDER_ID,
            orders: None,
            reference_id: Some("1234-5678".into()),
            submitted_at: Some(now - Duration::days(3)),
            approved_at: None,
            available_to_prime_at: None,
            excess_weight_qualified_at: None,
            excess_weight_acknowledged_at: None,
            billable_weights_reviewed_at: None,
            tio_remarks: None,
            financial_review_flag: false,
            financial_review_remarks: None,
            closeout_office_id: None,
            locked_by_office_user_id: None,
            lock_expires_at: None,
            additional_documents_id: Some(DEMO_DOCUMENT_ID),
            additional_documents: None,
            shipments: Vec::new(),
            created_at: now,
            updated_at: now,
        },
    );

    let submitted = shipment(DEMO_SUBMITTED_SHIPMENT_ID, ShipmentStatus::Submitted, now);
    let mut approved = shipment(
        DEMO_APPROVED_SHIPMENT_ID,
        ShipmentStatus::Approved,
        now + Duration::nanoseconds(1),
    );
    approved.approved_date = Some(now);
    approved.sit_extensions.push(SitExtension {
        id: DEMO_SIT_EXTENSION_ID,
        mto_shipment_id: DEMO_APPROVED_SHIPMENT_ID,
        request_reason: "SERIOUS_ILLNESS_MEMBER".into(),
        requested_days: 30,
        status: SitExtensionStatus::Pending,
        approved_days: None,
        contractor_remarks: Some("member hospitalized".into()),
        office_remarks: None,
        decision_date: None,
        customer_expense: false,
        created_at: now,
        updated_at: now,
    });
    let entry = (now - Duration::days(20)).date_naive();
    t.sit_statuses.insert(
        DEMO_APPROVED_SHIPMENT_ID,
        SitStatus {
            shipment_id: DEMO_APPROVED_SHIPMENT_ID,
            total_sit_days_used: 20,
            total_days_remaining: 70,
            calculated_total_days_in_sit: 20,
            current_sit: Some(CurrentSit {
                service_item_id: Uuid::new_v4(),
                location: "DESTINATION".into(),
                days_in_sit: 20,
                sit_entry_date: entry,
                sit_departure_date: None,
                sit_authorized_end_date: entry + Duration::days(90),
                sit_customer_contacted: None,
                sit_requested_delivery: None,
            }),
        },
    );
    t.shipments.insert(submitted.id, submitted);
    t.shipments.insert(approved.id, approved);

    t.payment_service_items.insert(
        DEMO_PAYMENT_SERVICE_ITEM_ID,
        PaymentServiceItem {
            id: DEMO_PAYMENT_SERVICE_ITEM_ID,
            move_task_order_id: DEMO_MOVE_ID,
            mto_service_item_id: Uuid::new_v4(),
            mto_service_item_code: "DLH".into(),
            mto_service_item_name: "Domestic linehaul".into(),
            mto_shipment_id: Some(DEMO_APPROVED_SHIPMENT_ID),
            price_cents: Some(125_000),
            rejection_reason: None,
            status: PaymentServiceItemStatus::Requested,
            reference_id: Some("1234-5678-1".into()),
            created_at: now,
            updated_at: now,
        },
    );

    t.transportation_offices.insert(DEMO_CLOSEOUT_OFFICE_ID, "PPPO Fort Gordon".into());
    t.office_users.insert(
        DEMO_OFFICE_USER_ID,
        OfficeUserRef {
            id: DEMO_OFFICE_USER_ID,
            first_name: "Quinn".into(),
            last_name: "Evaluator".into(),
            email: "qae@example.com".into(),
        },
    );
}
