const MAX_SLOTS: u32 = 7;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PageItem {
    Page(u32),
    Ellipsis { hidden: Vec<u32> },
}

pub fn total_pages(total_items: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }

    total_items.div_ceil(page_size).max(1)
}

/// Page buttons for a 1-based `current` page. The first and last pages and
/// the neighbours of `current` are always listed; longer gaps collapse into
/// an ellipsis that remembers which pages it hides.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    if total <= MAX_SLOTS {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut shown = vec![1, total];
    // Near either edge, widen the window so the row keeps a stable width.
    let (window_start, window_end) = if current <= 4 {
        (2, 5)
    } else if current >= total - 3 {
        (total - 4, total - 1)
    } else {
        (current - 1, current + 1)
    };
    shown.extend(window_start..=window_end);
    shown.sort_unstable();
    shown.dedup();

    let mut items = Vec::with_capacity(MAX_SLOTS as usize);
    let mut previous = 0;

    for page in shown {
        let gap = page - previous - 1;
        if gap == 1 {
            items.push(PageItem::Page(previous + 1));
        } else if gap > 1 {
            items.push(PageItem::Ellipsis {
                hidden: (previous + 1..page).collect(),
            });
        }
        items.push(PageItem::Page(page));
        previous = page;
    }

    items
}
