use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed domain failures surfaced by mutation handlers. Reads never produce
/// these; a missing record on a read is a soft miss (null data envelope).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("{entity} status cannot move from {from} to {to}")]
    BadTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn bad_transition(entity: &'static str, from: &'static str, to: &'static str) -> Self {
        ServiceError::BadTransition { entity, from, to }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::BadTransition { .. } => "bad_transition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Planning,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Planning => "PLANNING",
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Cancelled => "CANCELLED",
        }
    }

    /// Same-state writes always pass; COMPLETED and CANCELLED are terminal.
    pub fn can_move_to(self, next: Self) -> bool {
        use CampaignStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Planning, Active)
                | (Planning, Cancelled)
                | (Active, Paused)
                | (Active, Completed)
                | (Active, Cancelled)
                | (Paused, Active)
                | (Paused, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Trial,
    Registered,
    Lost,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Trial => "TRIAL",
            LeadStatus::Registered => "REGISTERED",
            LeadStatus::Lost => "LOST",
        }
    }

    /// Funnel moves one stage at a time; LOST is reachable from any live
    /// stage and can be re-engaged back to CONTACTED. REGISTERED is terminal.
    pub fn can_move_to(self, next: Self) -> bool {
        use LeadStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (New, Contacted)
                | (Contacted, Trial)
                | (Trial, Registered)
                | (New, Lost)
                | (Contacted, Lost)
                | (Trial, Lost)
                | (Lost, Contacted)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    Available,
    Occupied,
    Reserved,
}

impl TableState {
    pub fn as_str(self) -> &'static str {
        match self {
            TableState::Available => "AVAILABLE",
            TableState::Occupied => "OCCUPIED",
            TableState::Reserved => "RESERVED",
        }
    }

    pub fn can_move_to(self, next: Self) -> bool {
        use TableState::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Available, Occupied)
                | (Available, Reserved)
                | (Reserved, Occupied)
                | (Reserved, Available)
                | (Occupied, Available)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    OnlineAds,
    Social,
    Referral,
    Event,
    Partner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveStatus {
    Active,
    Inactive,
}

impl ActiveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "ACTIVE",
            ActiveStatus::Inactive => "INACTIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestLevel {
    Low,
    Medium,
    High,
}

impl InterestLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            InterestLevel::Low => "LOW",
            InterestLevel::Medium => "MEDIUM",
            InterestLevel::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Enrolled,
    Deferred,
    Withdrawn,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "ENROLLED",
            EnrollmentStatus::Deferred => "DEFERRED",
            EnrollmentStatus::Withdrawn => "WITHDRAWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Sales,
    Marketing,
    Manager,
    Teacher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodStatus {
    Available,
    SoldOut,
    Hidden,
}

/// One month of campaign/channel performance. Missing numeric fields default
/// to zero at deserialization so aggregation never sees holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetrics {
    pub month: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub leads: u64,
    #[serde(default)]
    pub new_students: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    pub code: String,
    pub status: CampaignStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub channel_ids: Vec<u64>,
    pub budget: f64,
    pub actual_cost: f64,
    pub expected_revenue: f64,
    pub actual_revenue: f64,
    pub lead_count: u64,
    pub new_student_count: u64,
    pub staff_id: Option<u64>,
    pub tags: Vec<String>,
    pub metrics_history: Vec<MonthlyMetrics>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u64,
    pub name: String,
    pub channel_type: ChannelType,
    pub status: ActiveStatus,
    pub owner: Option<String>,
    pub monthly_stats: Vec<MonthlyMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: u64,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: LeadStatus,
    pub interest_level: InterestLevel,
    pub channel_id: Option<u64>,
    pub campaign_id: Option<u64>,
    pub staff_id: Option<u64>,
    pub tags: Vec<String>,
    pub converted_student_id: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub code: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: ActiveStatus,
    pub enrollment_status: EnrollmentStatus,
    pub campaign_id: Option<u64>,
    pub channel_id: Option<u64>,
    pub staff_id: Option<u64>,
    pub tuition_fee: f64,
    pub paid_amount: f64,
    pub new_student: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: u64,
    pub code: String,
    pub full_name: String,
    pub role: StaffRole,
    pub department: Option<String>,
    pub status: ActiveStatus,
    pub campaign_ids: Vec<u64>,
    pub kpi_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRecord {
    pub id: u64,
    pub receipt_no: String,
    pub student_id: Option<u64>,
    pub campaign_id: Option<u64>,
    pub channel_id: Option<u64>,
    pub amount: f64,
    pub discount_amount: f64,
    pub net_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: u64,
    pub name: String,
    pub seats: u32,
    pub state: TableState,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: u64,
    pub name: String,
    pub category_id: Option<u64>,
    pub price: f64,
    pub status: FoodStatus,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

/// Monotonic id source, one per collection. Owned by the store so no caller
/// can observe the same next id twice.
#[derive(Debug, Default)]
pub struct IdSeq(u64);

impl IdSeq {
    pub fn starting_after(last: u64) -> Self {
        IdSeq(last)
    }

    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// The whole mock dataset. Constructor-injected into `AppState`; state dies
/// with the process.
#[derive(Debug, Default)]
pub struct Store {
    pub campaigns: Vec<Campaign>,
    pub channels: Vec<Channel>,
    pub leads: Vec<Lead>,
    pub students: Vec<Student>,
    pub staff: Vec<StaffMember>,
    pub revenue: Vec<RevenueRecord>,
    pub tables: Vec<DiningTable>,
    pub foods: Vec<Food>,
    pub categories: Vec<Category>,

    pub campaign_ids: IdSeq,
    pub channel_ids: IdSeq,
    pub lead_ids: IdSeq,
    pub student_ids: IdSeq,
    pub staff_ids: IdSeq,
    pub revenue_ids: IdSeq,
    pub table_ids: IdSeq,
    pub food_ids: IdSeq,
    pub category_ids: IdSeq,
}

impl Store {
    pub fn empty() -> Self {
        Store::default()
    }

    /// Demo dataset used by the storefront and dashboard out of the box.
    pub fn seeded() -> Self {
        let mm = |month: &str, spend: f64, leads: u64, new_students: u64, revenue: f64| {
            MonthlyMetrics {
                month: month.to_string(),
                spend,
                leads,
                new_students,
                revenue,
                profit: revenue - spend,
            }
        };
        let stamp = |d: &str| format!("{d}T08:00:00+00:00");

        let channels = vec![
            Channel {
                id: 1,
                name: "Facebook Ads".into(),
                channel_type: ChannelType::OnlineAds,
                status: ActiveStatus::Active,
                owner: Some("Mai Tran".into()),
                monthly_stats: vec![
                    mm("2025-05", 800.0, 40, 6, 3000.0),
                    mm("2025-06", 950.0, 52, 9, 4100.0),
                ],
            },
            Channel {
                id: 2,
                name: "Parent Referral".into(),
                channel_type: ChannelType::Referral,
                status: ActiveStatus::Active,
                owner: Some("Duc Pham".into()),
                monthly_stats: vec![
                    mm("2025-05", 120.0, 14, 5, 2200.0),
                    mm("2025-06", 150.0, 18, 7, 2900.0),
                ],
            },
            Channel {
                id: 3,
                name: "Open House".into(),
                channel_type: ChannelType::Event,
                status: ActiveStatus::Inactive,
                owner: None,
                monthly_stats: vec![mm("2025-05", 500.0, 25, 3, 1500.0)],
            },
        ];

        let staff = vec![
            StaffMember {
                id: 1,
                code: "NV001".into(),
                full_name: "Mai Tran".into(),
                role: StaffRole::Marketing,
                department: Some("Marketing".into()),
                status: ActiveStatus::Active,
                campaign_ids: vec![1, 2],
                kpi_score: 87.5,
            },
            StaffMember {
                id: 2,
                code: "NV002".into(),
                full_name: "Duc Pham".into(),
                role: StaffRole::Sales,
                department: Some("Admissions".into()),
                status: ActiveStatus::Active,
                campaign_ids: vec![1],
                kpi_score: 92.0,
            },
            StaffMember {
                id: 3,
                code: "NV003".into(),
                full_name: "Lan Hoang".into(),
                role: StaffRole::Manager,
                department: Some("Operations".into()),
                status: ActiveStatus::Active,
                campaign_ids: vec![],
                kpi_score: 78.0,
            },
            StaffMember {
                id: 4,
                code: "NV004".into(),
                full_name: "Binh Ngo".into(),
                role: StaffRole::Teacher,
                department: Some("Academics".into()),
                status: ActiveStatus::Inactive,
                campaign_ids: vec![3],
                kpi_score: 64.5,
            },
        ];

        let campaigns = vec![
            Campaign {
                id: 1,
                name: "Summer Intensive 2025".into(),
                code: "CMP-001".into(),
                status: CampaignStatus::Active,
                start_date: Some("2025-05-01".into()),
                end_date: Some("2025-07-31".into()),
                channel_ids: vec![1, 2],
                budget: 5000.0,
                actual_cost: 2020.0,
                expected_revenue: 9000.0,
                actual_revenue: 12200.0,
                lead_count: 124,
                new_student_count: 27,
                staff_id: Some(1),
                tags: vec!["summer".into(), "ielts".into()],
                metrics_history: vec![
                    mm("2025-05", 920.0, 54, 11, 5200.0),
                    mm("2025-06", 1100.0, 70, 16, 7000.0),
                ],
                created_at: stamp("2025-04-20"),
                updated_at: stamp("2025-06-30"),
            },
            Campaign {
                id: 2,
                name: "Back To School".into(),
                code: "CMP-002".into(),
                status: CampaignStatus::Planning,
                start_date: Some("2025-08-15".into()),
                end_date: Some("2025-09-30".into()),
                channel_ids: vec![1],
                budget: 3000.0,
                actual_cost: 0.0,
                expected_revenue: 6000.0,
                actual_revenue: 0.0,
                lead_count: 0,
                new_student_count: 0,
                staff_id: Some(1),
                tags: vec!["autumn".into()],
                metrics_history: vec![],
                created_at: stamp("2025-06-10"),
                updated_at: stamp("2025-06-10"),
            },
            Campaign {
                id: 3,
                name: "Spring Open House".into(),
                code: "CMP-003".into(),
                status: CampaignStatus::Completed,
                start_date: Some("2025-03-01".into()),
                end_date: Some("2025-04-15".into()),
                channel_ids: vec![3],
                budget: 1200.0,
                actual_cost: 980.0,
                expected_revenue: 2000.0,
                actual_revenue: 1500.0,
                lead_count: 25,
                new_student_count: 3,
                staff_id: Some(4),
                tags: vec![],
                metrics_history: vec![mm("2025-03", 980.0, 25, 3, 1500.0)],
                created_at: stamp("2025-02-12"),
                updated_at: stamp("2025-04-20"),
            },
        ];

        let leads = vec![
            Lead {
                id: 1,
                full_name: "An Nguyen".into(),
                phone: Some("0901000001".into()),
                email: Some("an.nguyen@example.com".into()),
                status: LeadStatus::Registered,
                interest_level: InterestLevel::High,
                channel_id: Some(1),
                campaign_id: Some(1),
                staff_id: Some(2),
                tags: vec!["ielts".into()],
                converted_student_id: Some(1),
                created_at: stamp("2025-05-03"),
                updated_at: stamp("2025-05-28"),
            },
            Lead {
                id: 2,
                full_name: "Thanh Vo".into(),
                phone: Some("0901000002".into()),
                email: None,
                status: LeadStatus::Trial,
                interest_level: InterestLevel::Medium,
                channel_id: Some(1),
                campaign_id: Some(1),
                staff_id: Some(2),
                tags: vec![],
                converted_student_id: None,
                created_at: stamp("2025-05-12"),
                updated_at: stamp("2025-06-02"),
            },
            Lead {
                id: 3,
                full_name: "Hoa Dang".into(),
                phone: None,
                email: Some("hoa.dang@example.com".into()),
                status: LeadStatus::Contacted,
                interest_level: InterestLevel::Low,
                channel_id: Some(2),
                campaign_id: Some(1),
                staff_id: Some(2),
                tags: vec!["sibling".into()],
                converted_student_id: None,
                created_at: stamp("2025-05-20"),
                updated_at: stamp("2025-05-22"),
            },
            Lead {
                id: 4,
                full_name: "Minh Chau".into(),
                phone: Some("0901000004".into()),
                email: None,
                status: LeadStatus::New,
                interest_level: InterestLevel::Medium,
                channel_id: Some(2),
                campaign_id: None,
                staff_id: None,
                tags: vec![],
                converted_student_id: None,
                created_at: stamp("2025-06-18"),
                updated_at: stamp("2025-06-18"),
            },
            Lead {
                id: 5,
                full_name: "Tuan Kiet".into(),
                phone: Some("0901000005".into()),
                email: None,
                status: LeadStatus::Lost,
                interest_level: InterestLevel::Low,
                channel_id: Some(3),
                campaign_id: Some(3),
                staff_id: Some(4),
                tags: vec![],
                converted_student_id: None,
                created_at: stamp("2025-03-15"),
                updated_at: stamp("2025-04-01"),
            },
        ];

        let students = vec![
            Student {
                id: 1,
                code: "HV001".into(),
                full_name: "An Nguyen".into(),
                phone: Some("0901000001".into()),
                email: Some("an.nguyen@example.com".into()),
                status: ActiveStatus::Active,
                enrollment_status: EnrollmentStatus::Enrolled,
                campaign_id: Some(1),
                channel_id: Some(1),
                staff_id: Some(2),
                tuition_fee: 1200.0,
                paid_amount: 800.0,
                new_student: true,
                created_at: stamp("2025-05-28"),
            },
            Student {
                id: 2,
                code: "HV002".into(),
                full_name: "Han Tran".into(),
                phone: Some("0901000012".into()),
                email: None,
                status: ActiveStatus::Active,
                enrollment_status: EnrollmentStatus::Enrolled,
                campaign_id: Some(1),
                channel_id: Some(2),
                staff_id: Some(2),
                tuition_fee: 950.0,
                paid_amount: 950.0,
                new_student: true,
                created_at: stamp("2025-06-05"),
            },
            Student {
                id: 3,
                code: "HV003".into(),
                full_name: "Bao Le".into(),
                phone: None,
                email: Some("bao.le@example.com".into()),
                status: ActiveStatus::Active,
                enrollment_status: EnrollmentStatus::Deferred,
                campaign_id: Some(3),
                channel_id: Some(3),
                staff_id: Some(4),
                tuition_fee: 700.0,
                paid_amount: 200.0,
                new_student: false,
                created_at: stamp("2025-04-10"),
            },
            Student {
                id: 4,
                code: "HV004".into(),
                full_name: "Linh Pham".into(),
                phone: Some("0901000044".into()),
                email: None,
                status: ActiveStatus::Inactive,
                enrollment_status: EnrollmentStatus::Withdrawn,
                campaign_id: None,
                channel_id: Some(2),
                staff_id: None,
                tuition_fee: 500.0,
                paid_amount: 500.0,
                new_student: false,
                created_at: stamp("2025-02-14"),
            },
        ];

        let revenue = vec![
            RevenueRecord {
                id: 1,
                receipt_no: "RCP-00001".into(),
                student_id: Some(1),
                campaign_id: Some(1),
                channel_id: Some(1),
                amount: 800.0,
                discount_amount: 0.0,
                net_amount: 800.0,
                payment_method: PaymentMethod::Transfer,
                payment_date: Some("2025-05-28".into()),
            },
            RevenueRecord {
                id: 2,
                receipt_no: "RCP-00002".into(),
                student_id: Some(2),
                campaign_id: Some(1),
                channel_id: Some(2),
                amount: 1000.0,
                discount_amount: 50.0,
                net_amount: 950.0,
                payment_method: PaymentMethod::Cash,
                payment_date: Some("2025-06-05".into()),
            },
            RevenueRecord {
                id: 3,
                receipt_no: "RCP-00003".into(),
                student_id: Some(3),
                campaign_id: Some(3),
                channel_id: Some(3),
                amount: 200.0,
                discount_amount: 0.0,
                net_amount: 200.0,
                payment_method: PaymentMethod::Card,
                payment_date: Some("2025-04-10".into()),
            },
            RevenueRecord {
                id: 4,
                receipt_no: "RCP-00004".into(),
                student_id: Some(4),
                campaign_id: None,
                channel_id: Some(2),
                amount: 500.0,
                discount_amount: 25.0,
                net_amount: 475.0,
                payment_method: PaymentMethod::Transfer,
                payment_date: Some("2025-02-14".into()),
            },
        ];

        let tables = vec![
            DiningTable {
                id: 1,
                name: "T1".into(),
                seats: 2,
                state: TableState::Available,
                note: None,
            },
            DiningTable {
                id: 2,
                name: "T2".into(),
                seats: 4,
                state: TableState::Occupied,
                note: Some("window".into()),
            },
            DiningTable {
                id: 3,
                name: "T3".into(),
                seats: 4,
                state: TableState::Reserved,
                note: Some("reserved 19:00".into()),
            },
            DiningTable {
                id: 4,
                name: "T4".into(),
                seats: 6,
                state: TableState::Available,
                note: None,
            },
            DiningTable {
                id: 5,
                name: "T5".into(),
                seats: 8,
                state: TableState::Available,
                note: Some("private room".into()),
            },
        ];

        let categories = vec![
            Category {
                id: 1,
                name: "Mains".into(),
                description: Some("Rice and noodle dishes".into()),
            },
            Category {
                id: 2,
                name: "Drinks".into(),
                description: None,
            },
            Category {
                id: 3,
                name: "Desserts".into(),
                description: None,
            },
        ];

        let foods = vec![
            Food {
                id: 1,
                name: "Pho Bo".into(),
                category_id: Some(1),
                price: 8.5,
                status: FoodStatus::Available,
                image_url: None,
                description: Some("Beef noodle soup".into()),
            },
            Food {
                id: 2,
                name: "Com Tam".into(),
                category_id: Some(1),
                price: 7.0,
                status: FoodStatus::Available,
                image_url: None,
                description: None,
            },
            Food {
                id: 3,
                name: "Banh Mi".into(),
                category_id: Some(1),
                price: 4.5,
                status: FoodStatus::SoldOut,
                image_url: None,
                description: None,
            },
            Food {
                id: 4,
                name: "Ca Phe Sua Da".into(),
                category_id: Some(2),
                price: 3.0,
                status: FoodStatus::Available,
                image_url: None,
                description: Some("Iced milk coffee".into()),
            },
            Food {
                id: 5,
                name: "Tra Da".into(),
                category_id: Some(2),
                price: 1.0,
                status: FoodStatus::Hidden,
                image_url: None,
                description: None,
            },
            Food {
                id: 6,
                name: "Che Ba Mau".into(),
                category_id: Some(3),
                price: 3.5,
                status: FoodStatus::Available,
                image_url: None,
                description: None,
            },
        ];

        Store {
            campaign_ids: IdSeq::starting_after(campaigns.len() as u64),
            channel_ids: IdSeq::starting_after(channels.len() as u64),
            lead_ids: IdSeq::starting_after(leads.len() as u64),
            student_ids: IdSeq::starting_after(students.len() as u64),
            staff_ids: IdSeq::starting_after(staff.len() as u64),
            revenue_ids: IdSeq::starting_after(revenue.len() as u64),
            table_ids: IdSeq::starting_after(tables.len() as u64),
            food_ids: IdSeq::starting_after(foods.len() as u64),
            category_ids: IdSeq::starting_after(categories.len() as u64),
            campaigns,
            channels,
            leads,
            students,
            staff,
            revenue,
            tables,
            foods,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_seq_is_monotonic_from_one() {
        let mut seq = IdSeq::default();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        let mut seeded = IdSeq::starting_after(5);
        assert_eq!(seeded.next(), 6);
    }

    #[test]
    fn campaign_transitions() {
        use CampaignStatus::*;
        assert!(Planning.can_move_to(Active));
        assert!(Planning.can_move_to(Planning));
        assert!(!Planning.can_move_to(Completed));
        assert!(Active.can_move_to(Paused));
        assert!(Paused.can_move_to(Active));
        assert!(!Completed.can_move_to(Active));
        assert!(!Cancelled.can_move_to(Planning));
    }

    #[test]
    fn lead_transitions_follow_funnel() {
        use LeadStatus::*;
        assert!(New.can_move_to(Contacted));
        assert!(Contacted.can_move_to(Trial));
        assert!(Trial.can_move_to(Registered));
        assert!(!New.can_move_to(Registered));
        assert!(Trial.can_move_to(Lost));
        assert!(Lost.can_move_to(Contacted));
        assert!(!Registered.can_move_to(Lost));
    }

    #[test]
    fn table_transitions() {
        use TableState::*;
        assert!(Available.can_move_to(Reserved));
        assert!(Reserved.can_move_to(Occupied));
        assert!(Occupied.can_move_to(Available));
        assert!(!Occupied.can_move_to(Reserved));
    }

    #[test]
    fn seed_ids_line_up_with_counters() {
        let mut s = Store::seeded();
        let next = s.campaign_ids.next();
        assert!(s.campaigns.iter().all(|c| c.id < next));
        let next = s.student_ids.next();
        assert!(s.students.iter().all(|c| c.id < next));
    }
}
