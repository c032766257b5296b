use crate::highlight::HIGHLIGHT_CLASS;

/// Stylesheet for the overlay; embed once in the host page.
#[must_use]
pub const fn overlay_css() -> &'static str {
    ".tour-backdrop{position:fixed;inset:0;z-index:9000;background:rgba(0,0,0,.45)} \
     .tour-backdrop--spotlit{background:transparent} \
     .tour-spotlight{position:fixed;z-index:9001;border-radius:6px;box-shadow:0 0 0 9999px rgba(0,0,0,.45);pointer-events:none} \
     .tour-tooltip{position:fixed;z-index:9002;box-sizing:border-box;overflow:auto;background:#fff;color:#111;border-radius:8px;padding:16px;box-shadow:0 8px 24px rgba(0,0,0,.25)} \
     .tour-arrow{position:absolute;width:12px;height:12px;background:inherit;transform:rotate(45deg)} \
     .tour-arrow--top{top:-6px;left:calc(50% - 6px)} \
     .tour-arrow--bottom{bottom:-6px;left:calc(50% - 6px)} \
     .tour-arrow--left{left:-6px;top:calc(50% - 6px)} \
     .tour-arrow--right{right:-6px;top:calc(50% - 6px)} \
     .tour-dots{display:flex;gap:6px;list-style:none;padding:0} \
     .tour-dot{width:8px;height:8px;border-radius:50%;border:0;padding:0;background:#bbb} \
     .tour-dot--current{background:#00D9C0} \
     .tour-tooltip button:focus{outline:3px solid #00D9C0;outline-offset:2px} \
     .tour-highlight{position:relative;z-index:9001}"
}

/// Class name the highlight rule in [`overlay_css`] targets.
#[must_use]
pub const fn highlight_class() -> &'static str {
    HIGHLIGHT_CLASS
}
