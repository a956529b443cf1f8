//! Table components for the dashboard: the transaction listing and the
//! monthly statistics summary.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    report::Statistics,
    transaction::Transaction,
};

/// Renders one page of transactions.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded shadow-md"
        {
            table id="transactions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            td class=(TABLE_CELL_STYLE) { (transaction.title) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(transaction.price)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE) { @if transaction.sold { "Yes" } @else { "No" } }
                            td class=(TABLE_CELL_STYLE) { (transaction.date_of_sale.date()) }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the sales statistics of a month.
pub(super) fn statistics_table(month: &str, statistics: &Statistics) -> Markup {
    html! {
        div class="w-full max-w-md rounded shadow-md bg-white dark:bg-gray-800 p-4"
        {
            h3 class="text-xl font-semibold mb-2" { "Statistics - " (month) }

            table id="statistics" class="w-full text-sm text-left"
            {
                tbody
                {
                    tr
                    {
                        th scope="row" class="py-1" { "Total sale" }
                        td class="py-1 text-right" { (format_currency(statistics.total_sale_amount)) }
                    }
                    tr
                    {
                        th scope="row" class="py-1" { "Total sold items" }
                        td class="py-1 text-right" { (statistics.total_sold_items) }
                    }
                    tr
                    {
                        th scope="row" class="py-1" { "Total not sold items" }
                        td class="py-1 text-right" { (statistics.total_not_sold_items) }
                    }
                }
            }
        }
    }
}
