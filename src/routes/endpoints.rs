//! The API endpoint URIs.

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to get, update or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the overall balance report.
pub const CURRENT_BALANCE: &str = "/api/transactions/current-balance";
/// The route for the yearly income total report.
pub const TOTAL_INCOME: &str = "/api/transactions/total-income";
/// The route for the yearly expense total report.
pub const TOTAL_EXPENSE: &str = "/api/transactions/total-expense";
/// The route for the yearly per-category expense breakdown report.
pub const TOTAL_EXPENSE_BY_CATEGORY: &str = "/api/transactions/total-expense-by-category";
/// The route for the yearly month-by-month income/expense report.
pub const MONTHLY_TOTALS: &str = "/api/transactions/income-expense-totals-by-month";
/// The route for scanning a receipt into a candidate transaction.
pub const SCAN_RECEIPT: &str = "/api/transactions/ocr";
