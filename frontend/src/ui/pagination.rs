use yew::prelude::*;

/// Page buttons shown on either side of the current page.
const SPAN: usize = 2;

/// One-based page numbers to render: a window around `current`, clipped to
/// `1..=total`.
pub fn visible_pages(current: usize, total: usize, span: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let first = current.saturating_sub(span).max(1);
    let last = (current + span).min(total);
    (first..=last).collect()
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub on_page: Callback<usize>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    if props.total_pages <= 1 {
        return html! {
            <p class="px-4 py-3 text-xs text-slate-500">{ format!("{} data", props.total_rows) }</p>
        };
    }

    let go = |page: usize| {
        let on_page = props.on_page.clone();
        Callback::from(move |_| on_page.emit(page))
    };
    let base = "px-3 py-1 rounded-lg text-xs font-semibold border border-border disabled:opacity-40";

    html! {
        <div class="flex items-center justify-between px-4 py-3">
            <p class="text-xs text-slate-500">
                { format!("Halaman {} dari {} ({} data)", props.page, props.total_pages, props.total_rows) }
            </p>
            <div class="flex items-center gap-1">
                <button class={base} disabled={props.page <= 1} onclick={go(props.page.saturating_sub(1))}>{"Prev"}</button>
                { for visible_pages(props.page, props.total_pages, SPAN).into_iter().map(|page| {
                    let class = if page == props.page {
                        classes!(base, "bg-[#173E63]", "text-white")
                    } else {
                        classes!(base, "hover:bg-slate-100")
                    };
                    html! { <button {class} onclick={go(page)}>{ page }</button> }
                }) }
                <button class={base} disabled={props.page >= props.total_pages} onclick={go(props.page + 1)}>{"Next"}</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, vec![1, 2, 3])]
    #[case(5, 10, vec![3, 4, 5, 6, 7])]
    #[case(10, 10, vec![8, 9, 10])]
    #[case(1, 1, vec![1])]
    #[case(7, 3, vec![1, 2, 3])]
    fn window_around_current(#[case] current: usize, #[case] total: usize, #[case] expected: Vec<usize>) {
        assert_eq!(visible_pages(current, total, SPAN), expected);
    }

    #[test]
    fn no_pages_without_rows() {
        assert!(visible_pages(1, 0, SPAN).is_empty());
    }
}
