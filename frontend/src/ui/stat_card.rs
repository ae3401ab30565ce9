use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Neutral,
    Positive,
    Negative,
}

impl Accent {
    /// Colour for a balance: red below zero, green otherwise.
    pub fn for_amount(amount: i64) -> Self {
        if amount < 0 {
            Accent::Negative
        } else {
            Accent::Positive
        }
    }

    fn text_class(self) -> &'static str {
        match self {
            Accent::Neutral => "text-[#1D617A]",
            Accent::Positive => "text-emerald-600",
            Accent::Negative => "text-red-600",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    pub icon: Html,
    #[prop_or(Accent::Neutral)]
    pub accent: Accent,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title.clone() }</p>
                <h3 class={classes!("text-2xl", "font-bold", "tracking-tight", props.accent.text_class())}>{ props.value.clone() }</h3>
                if let Some(hint) = &props.hint {
                    <p class="text-xs text-slate-500 mt-1">{ hint.clone() }</p>
                }
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                { props.icon.clone() }
            </div>
        </div>
    }
}
