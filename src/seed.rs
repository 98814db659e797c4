//! Fixture data
//!
//! Two accounts and six finance-method articles, applied to any [`Store`]
//! by the `seed` binary.

use chrono::Utc;

use crate::auth::hash_password;
use crate::db::Store;
use crate::domain::{FinanceMethod, NewFinanceMethod, NewUser, Role, User};
use crate::error::{AppError, AppResult};
use crate::repository::{FinanceMethodRepository, UserRepository};

struct UserFixture {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

struct MethodFixture {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    methodology: &'static str,
    benefits: [&'static str; 4],
    image_url: &'static str,
}

const ADMIN_EMAIL: &str = "admin@example.com";

const USERS: &[UserFixture] = &[
    UserFixture {
        name: "Admin User",
        email: ADMIN_EMAIL,
        password: "admin123",
        role: Role::Admin,
    },
    UserFixture {
        name: "Public User",
        email: "user@example.com",
        password: "user123",
        role: Role::Public,
    },
];

const IMAGE_BUDGET: &str = "https://images.unsplash.com/photo-1553877522-43269d4ea984?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1170&q=80";
const IMAGE_LEDGER: &str = "https://images.unsplash.com/photo-1554224155-6726b3ff858f?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1170&q=80";
const IMAGE_CARD: &str = "https://images.unsplash.com/photo-1556742111-a301076d9d18?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1170&q=80";

const FINANCE_METHODS: &[MethodFixture] = &[
    MethodFixture {
        title: "50/30/20 Budgeting Rule",
        description: "A simple budgeting method that divides your income into three categories: 50% for needs, 30% for wants, and 20% for savings and debt repayment.",
        category: "Budgeting",
        methodology: "1. Calculate your after-tax income\n2. Allocate 50% to needs (rent, groceries, utilities)\n3. Allocate 30% to wants (entertainment, dining out)\n4. Allocate 20% to savings and debt repayment\n5. Adjust percentages based on your financial situation",
        benefits: [
            "Easy to understand and implement",
            "Ensures you save money consistently",
            "Helps prioritize essential expenses",
            "Flexible and adaptable to different income levels",
        ],
        image_url: IMAGE_BUDGET,
    },
    MethodFixture {
        title: "Zero-Based Budgeting",
        description: "A budgeting method where every dollar of income is assigned a specific purpose, ensuring your income minus expenses equals zero.",
        category: "Budgeting",
        methodology: "1. List all sources of income\n2. List all expenses for the month\n3. Assign every dollar a job\n4. Track spending throughout the month\n5. Adjust as needed",
        benefits: [
            "Gives complete control over your money",
            "Eliminates wasteful spending",
            "Helps achieve specific financial goals",
            "Provides clear picture of financial health",
        ],
        image_url: IMAGE_LEDGER,
    },
    MethodFixture {
        title: "Emergency Fund Building",
        description: "Creating a financial safety net to cover unexpected expenses without going into debt.",
        category: "Saving",
        methodology: "1. Set a savings goal (3-6 months of expenses)\n2. Open a separate high-yield savings account\n3. Start with a small amount if needed\n4. Automate monthly transfers\n5. Increase contributions over time",
        benefits: [
            "Provides financial security",
            "Reduces stress during emergencies",
            "Avoids high-interest debt",
            "Creates peace of mind",
        ],
        image_url: IMAGE_CARD,
    },
    MethodFixture {
        title: "Compound Interest Investing",
        description: "Investing strategy that leverages the power of compound interest to grow wealth over time.",
        category: "Investment",
        methodology: "1. Start investing early to maximize compound growth\n2. Choose diversified investments (index funds, ETFs)\n3. Reinvest dividends and gains\n4. Maintain consistent contributions\n5. Stay invested for the long term",
        benefits: [
            "Accelerates wealth growth exponentially",
            "Requires minimal active management",
            "Builds substantial wealth over time",
            "Reduces impact of market volatility",
        ],
        image_url: IMAGE_BUDGET,
    },
    MethodFixture {
        title: "Debt Snowball Method",
        description: "A debt repayment strategy that focuses on paying off debts from smallest to largest balance for psychological wins.",
        category: "Debt Management",
        methodology: "1. List all debts from smallest to largest\n2. Make minimum payments on all debts\n3. Put extra money toward smallest debt\n4. Once smallest debt is paid, move to next smallest\n5. Continue until all debts are eliminated",
        benefits: [
            "Provides motivation through quick wins",
            "Simplifies debt repayment process",
            "Builds momentum for larger debts",
            "Improves financial behavior",
        ],
        image_url: IMAGE_CARD,
    },
    MethodFixture {
        title: "Expense Tracking",
        description: "Monitoring and recording all spending to understand where your money goes and identify savings opportunities.",
        category: "Expense Tracking",
        methodology: "1. Choose a tracking method (app, spreadsheet, notebook)\n2. Record every expense immediately\n3. Categorize expenses\n4. Review spending weekly\n5. Identify patterns and adjust spending",
        benefits: [
            "Reveals spending habits",
            "Identifies unnecessary expenses",
            "Helps stay within budget",
            "Provides data for financial decisions",
        ],
        image_url: IMAGE_LEDGER,
    },
];

/// Row counts touched by a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: u64,
    pub finance_methods: u64,
}

/// Replace all users and finance methods with the fixture set.
///
/// Contact inquiries are left alone.
pub async fn import(store: &Store) -> AppResult<SeedSummary> {
    destroy(store).await?;

    let users = UserRepository::new(store.clone());
    let methods = FinanceMethodRepository::new(store.clone());

    let mut admin: Option<User> = None;
    for fixture in USERS {
        let user = User::create(
            NewUser::new(fixture.name, fixture.email, hash_password(fixture.password)?)
                .with_role(fixture.role),
            Utc::now(),
        );
        users.insert(&user).await?;

        if user.email == ADMIN_EMAIL {
            admin = Some(user);
        }
    }

    let admin = admin.ok_or_else(|| AppError::Internal("Seed admin was not created".to_string()))?;

    for fixture in FINANCE_METHODS {
        let method = FinanceMethod::create(
            NewFinanceMethod {
                title: fixture.title.to_string(),
                description: fixture.description.to_string(),
                category: fixture.category.to_string(),
                methodology: fixture.methodology.to_string(),
                benefits: fixture.benefits.iter().map(|b| b.to_string()).collect(),
                image_url: Some(fixture.image_url.to_string()),
                created_by: admin.id,
            },
            Utc::now(),
        );
        methods.insert(&method).await?;
    }

    let summary = SeedSummary {
        users: USERS.len() as u64,
        finance_methods: FINANCE_METHODS.len() as u64,
    };

    tracing::info!(users = summary.users, finance_methods = summary.finance_methods, "Data imported");

    Ok(summary)
}

/// Delete every user and finance method
pub async fn destroy(store: &Store) -> AppResult<SeedSummary> {
    let finance_methods = FinanceMethodRepository::new(store.clone()).delete_all().await?;
    let users = UserRepository::new(store.clone()).delete_all().await?;

    tracing::info!(users, finance_methods, "Data destroyed");

    Ok(SeedSummary { users, finance_methods })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::domain::FinanceMethodFilter;

    #[tokio::test]
    async fn test_import_creates_fixtures_authored_by_admin() {
        let store = Store::memory();

        let summary = import(&store).await.unwrap();
        assert_eq!(summary, SeedSummary { users: 2, finance_methods: 6 });

        let admin = UserRepository::new(store.clone())
            .find_by_email(ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(verify_password("admin123", &admin.password_hash));

        let methods = FinanceMethodRepository::new(store.clone())
            .list(&FinanceMethodFilter::default())
            .await
            .unwrap();
        assert_eq!(methods.len(), 6);
        assert!(methods
            .iter()
            .all(|m| m.created_by.as_ref().map(|a| a.id) == Some(admin.id)));
    }

    #[tokio::test]
    async fn test_import_twice_replaces_data() {
        let store = Store::memory();
        import(&store).await.unwrap();
        import(&store).await.unwrap();

        let budgeting = FinanceMethodRepository::new(store.clone())
            .list(&FinanceMethodFilter::new(Some("Budgeting".to_string()), None))
            .await
            .unwrap();
        assert_eq!(budgeting.len(), 2);
    }

    #[tokio::test]
    async fn test_destroy_reports_removed_rows() {
        let store = Store::memory();
        import(&store).await.unwrap();

        let removed = destroy(&store).await.unwrap();
        assert_eq!(removed, SeedSummary { users: 2, finance_methods: 6 });

        let user = UserRepository::new(store.clone())
            .find_by_email("user@example.com")
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
