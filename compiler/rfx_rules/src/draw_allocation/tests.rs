use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{android, assert_rewrites, assert_unchanged};

fn view(body: &str) -> String {
    format!(
        "import android.graphics.Canvas;
import android.graphics.Paint;
import android.graphics.Rect;
import android.view.View;
import java.util.ArrayList;

class Chart extends View {{
{body}}}
"
    )
}

#[test]
fn test_allocations_become_fields() {
    assert_rewrites(
        &DrawAllocation,
        android(),
        &view(
            "    @Override
    protected void onDraw(Canvas canvas) {
        Paint paint = new Paint();
        Rect bounds = (Rect) new Rect(0, 0, 10, 10);
        int size = 4;
        canvas.drawRect(bounds, paint);
    }
",
        ),
        &view(
            "    private Paint paint = new Paint();
    private Rect bounds = (Rect) new Rect(0, 0, 10, 10);
    @Override
    protected void onDraw(Canvas canvas) {
        int size = 4;
        canvas.drawRect(bounds, paint);
    }
",
        ),
    );
}

#[test]
fn test_empty_collection_is_cleared_each_frame() {
    assert_rewrites(
        &DrawAllocation,
        android(),
        &view(
            "    protected void onDraw(Canvas canvas) {
        ArrayList<String> labels = new ArrayList<String>();
        labels.add(\"x\");
    }
",
        ),
        &view(
            "    private ArrayList<String> labels = new ArrayList<String>();
    protected void onDraw(Canvas canvas) {
        labels.clear();
        labels.add(\"x\");
    }
",
        ),
    );
}

#[test]
fn test_dependent_or_reassigned_locals_stay() {
    let source = view(
        "    Paint taken;

    protected void onDraw(Canvas canvas) {
        Paint flagged = new Paint(Paint.ANTI_ALIAS_FLAG);
        Paint made = new Paint(canvas.getDensity());
        Paint taken = new Paint();
        Paint again = new Paint();
        again = new Paint();
        ArrayList<String> sized = new ArrayList<String>(10);
        Object listener = new Object() {
        };
    }
",
    );
    assert_unchanged(&DrawAllocation, android(), &source);
}

#[test]
fn test_other_methods_and_platforms_are_ignored() {
    let source = view(
        "    protected void onLayout(Canvas canvas) {
        Paint paint = new Paint();
    }
",
    );
    assert_unchanged(&DrawAllocation, android(), &source);

    let draw = view(
        "    protected void onDraw(Canvas canvas) {
        Paint paint = new Paint();
    }
",
    );
    assert_unchanged(&DrawAllocation, ProjectOptions::default(), &draw);
}
