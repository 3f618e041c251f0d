//! The summary shown once a transaction has been recorded.

use maud::{Markup, html};

use crate::{
    drawer::{draft::Draft, session::FormSession, totals::round2},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, SECTION_HEADER_STYLE, SECTION_STYLE, format_currency},
};

/// The denomination value and count for every bill and coin, largest first.
fn denominations(draft: &Draft) -> [(f64, f64); 8] {
    [
        (20.0, draft.bill20),
        (10.0, draft.bill10),
        (5.0, draft.bill5),
        (1.0, draft.bill1),
        (0.25, draft.coin25),
        (0.10, draft.coin10),
        (0.05, draft.coin5),
        (0.01, draft.coin1),
    ]
}

fn line(label: &str, value: &str) -> Markup {
    html! {
        div class="flex justify-between gap-4"
        {
            dt { (label) }
            dd class="font-mono" { (value) }
        }
    }
}

/// The confirmation for a submitted session, with a button to start over.
pub fn confirmation_view(session: &FormSession) -> Markup {
    let draft = session.draft();
    let totals = session.totals();
    let transaction_id = session
        .result()
        .and_then(|result| result.transaction_id.as_deref());
    let counted = denominations(draft)
        .into_iter()
        .filter(|(_, count)| *count > 0.0)
        .collect::<Vec<_>>();
    let pay_outs = draft
        .pay_outs
        .iter()
        .filter(|pay_out| pay_out.amount > 0.0)
        .collect::<Vec<_>>();

    html! {
        div id="confirmation" class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Transaction Complete" }

            section class=(SECTION_STYLE)
            {
                dl class="space-y-2"
                {
                    @if let Some(transaction_id) = transaction_id {
                        (line("Transaction ID", transaction_id))
                    }

                    (line("Date", &draft.sale_date))
                }
            }

            @if !counted.is_empty() {
                section class=(SECTION_STYLE)
                {
                    h3 class=(SECTION_HEADER_STYLE) { "Cash" }

                    dl id="denominations" class="space-y-2"
                    {
                        @for (value, count) in counted {
                            (line(
                                &format!("{} × {count}", format_currency(value)),
                                &format_currency(round2(value * count)),
                            ))
                        }

                        (line("Bills", &format_currency(totals.bills_subtotal)))
                        (line("Coins", &format_currency(totals.coins_subtotal)))
                    }
                }
            }

            @if !pay_outs.is_empty() {
                section class=(SECTION_STYLE)
                {
                    h3 class=(SECTION_HEADER_STYLE) { "Pay Outs" }

                    dl class="space-y-2"
                    {
                        @for pay_out in pay_outs {
                            (line(&pay_out.description, &format_currency(-pay_out.amount)))
                        }
                    }
                }
            }

            section class=(SECTION_STYLE)
            {
                dl class="space-y-2"
                {
                    @if totals.ath_subtotal > 0.0 {
                        (line("ATH", &format_currency(totals.ath_subtotal)))

                        @if !draft.ath_reference.is_empty() {
                            (line("ATH reference", &draft.ath_reference))
                        }
                    }

                    @if totals.lecture_subtotal > 0.0 {
                        (line("Lecture total (information only)", &format_currency(totals.lecture_subtotal)))
                    }

                    @if totals.petty_cash_subtotal > 0.0 {
                        (line("Petty cash", &format_currency(-totals.petty_cash_subtotal)))
                    }

                    div class="flex justify-between gap-4 text-lg font-semibold"
                    {
                        dt { "Net Total" }
                        dd id="net-total" class="font-mono" { (format_currency(totals.net_total)) }
                    }
                }
            }

            button
                type="button"
                hx-post=(endpoints::RESET)
                hx-target-error="#alert-container"
                class=(BUTTON_PRIMARY_STYLE)
            {
                "New Transaction"
            }
        }
    }
}
